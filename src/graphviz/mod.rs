use std::path::Path;

use log::info;
use tabbycat::attributes::{color, label, Color};
use tabbycat::{AttrList, Edge, GraphBuilder, GraphType, Identity, StmtList};

use super::{text_format, AutomatonError, AutomatonResult, AutomatonTransition, Dfa, Nfa};

const START_NODE: &str = "start";
const EPSILON_LABEL: &str = "ε";

/// Everything a DOT rendering needs, borrowed from either kind of automaton.
struct GraphSketch<'a> {
    name: &'a str,
    start: &'a str,
    nodes: Vec<(&'a str, bool)>,
    edges: Vec<(&'a str, String, &'a str)>,
}

impl<'a> GraphSketch<'a> {
    fn render(&self) -> AutomatonResult<String> {
        let mut stmts = StmtList::new().add_edge(
            Edge::head_node(Identity::quoted(START_NODE), None)
                .arrow_to_node(Identity::quoted(self.start), None),
        );

        for &(node, accepting) in self.nodes.iter() {
            let attrs = if accepting {
                Some(AttrList::new().add_pair(color(Color::Red)))
            } else {
                None
            };
            stmts = stmts.add_node(Identity::quoted(node), None, attrs);
        }

        for (from, symbol, to) in self.edges.iter() {
            stmts = stmts.add_edge(
                Edge::head_node(Identity::quoted(*from), None)
                    .arrow_to_node(Identity::quoted(*to), None)
                    .add_attrpair(label(symbol.as_str())),
            );
        }

        let graph = GraphBuilder::default()
            .graph_type(GraphType::DiGraph)
            .strict(false)
            .id(Identity::quoted(self.name))
            .stmts(stmts)
            .build()
            .map_err(|err| AutomatonError::Render(err.to_string()))?;

        Ok(graph.to_string())
    }
}

impl Nfa {
    pub fn to_dot(&self) -> AutomatonResult<String> {
        let sketch = GraphSketch {
            name: "nfa",
            start: &self.start_state,
            nodes: self
                .states
                .iter()
                .map(|state| (state.as_str(), self.accept_states.contains(state)))
                .collect(),
            edges: self
                .transitions()
                .map(|(from, transition, to)| {
                    let symbol = match transition {
                        AutomatonTransition::Epsilon => EPSILON_LABEL.to_string(),
                        AutomatonTransition::Symbol(symbol) => symbol.to_string(),
                    };
                    (from, symbol, to)
                })
                .collect(),
        };

        sketch.render()
    }

    pub fn dump<P: AsRef<Path>>(&self, path: P) -> AutomatonResult<()> {
        let path = path.as_ref();
        text_format::write_file(path, &self.to_dot()?)?;
        info!("NFA graph written to {}", path.display());
        Ok(())
    }
}

impl Dfa {
    pub fn to_dot(&self) -> AutomatonResult<String> {
        let sketch = GraphSketch {
            name: "dfa",
            start: self
                .state(self.start_state)
                .map(|state| state.label())
                .unwrap_or_default(),
            nodes: self
                .states
                .iter()
                .enumerate()
                .map(|(id, state)| (state.label(), self.is_accepting(id)))
                .collect(),
            edges: self
                .transitions()
                .map(|(from, symbol, to)| {
                    (
                        self.states[from].label(),
                        symbol.to_string(),
                        self.states[to].label(),
                    )
                })
                .collect(),
        };

        sketch.render()
    }

    pub fn dump<P: AsRef<Path>>(&self, path: P) -> AutomatonResult<()> {
        let path = path.as_ref();
        text_format::write_file(path, &self.to_dot()?)?;
        info!("DFA graph written to {}", path.display());
        Ok(())
    }
}
