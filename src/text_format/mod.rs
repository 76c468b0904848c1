use std::{
    fmt::{self, Write as _},
    fs,
    path::Path,
};

use log::{info, warn};

use super::{
    AutomatonError, AutomatonResult, AutomatonTransition, Dfa, DfaState, DfaStateId, Nfa,
    StateLabel, WordResult,
};

const HEADER_SECTIONS: [&str; 3] = ["states", "initial state", "final states"];

impl Nfa {
    /// Parses the line-oriented NFA layout:
    ///
    /// ```text
    /// A B C        states
    /// A            initial state
    /// C            final states
    /// A h B        one `<state> <symbol> <next-state>` per line
    /// B 1 C
    /// ```
    ///
    /// A symbol equal to `epsilon_token` becomes [`AutomatonTransition::Epsilon`].
    pub fn from_text(text: &str, epsilon_token: &str) -> AutomatonResult<Self> {
        let mut lines = text.lines();
        let mut header = Vec::with_capacity(HEADER_SECTIONS.len());

        for (index, section) in HEADER_SECTIONS.iter().enumerate() {
            match lines.next() {
                Some(line) => header.push(line),
                None => {
                    return Err(AutomatonError::MissingSection {
                        line: index + 1,
                        section: *section,
                    })
                }
            }
        }

        let initial = header[1].split_whitespace().collect::<Vec<_>>();
        let start_state = match initial.as_slice() {
            [start_state] => *start_state,
            _ => {
                return Err(AutomatonError::MalformedInitialState {
                    line: 2,
                    content: header[1].to_string(),
                })
            }
        };

        let mut nfa = Self::default();
        for state in header[0].split_whitespace() {
            nfa.add_state(state);
        }
        let declared = nfa.states.clone();

        nfa.start_state = start_state.to_string();
        nfa.add_state(start_state);
        for state in header[2].split_whitespace() {
            nfa.add_accept_state(state);
        }

        for (index, line) in lines.enumerate() {
            let line_no = index + HEADER_SECTIONS.len() + 1;
            let tokens = line.split_whitespace().collect::<Vec<_>>();

            let (from, token, to) = match tokens.as_slice() {
                [] => continue,
                [from, token, to] => (*from, *token, *to),
                _ => {
                    return Err(AutomatonError::MalformedTransition {
                        line: line_no,
                        content: line.to_string(),
                    })
                }
            };

            let transition = parse_symbol(token, epsilon_token, line_no)?;
            nfa.add_transition(from, transition, to);
        }

        let undeclared = nfa.states.difference(&declared).collect::<Vec<&StateLabel>>();
        if !undeclared.is_empty() {
            warn!("states {:?} are used but not declared on line 1", undeclared);
        }

        info!(
            "loaded NFA with {} states, {} final, {} transitions",
            nfa.states.len(),
            nfa.accept_states.len(),
            nfa.transitions().count()
        );

        Ok(nfa)
    }

    pub fn from_file<P: AsRef<Path>>(path: P, epsilon_token: &str) -> AutomatonResult<Self> {
        let text = read_file(path.as_ref())?;
        Self::from_text(&text, epsilon_token)
    }
}

fn parse_symbol(
    token: &str,
    epsilon_token: &str,
    line: usize,
) -> AutomatonResult<AutomatonTransition> {
    if token == epsilon_token {
        return Ok(AutomatonTransition::Epsilon);
    }

    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(AutomatonTransition::Symbol(symbol)),
        _ => Err(AutomatonError::MultiCharSymbol {
            line,
            token: token.to_string(),
        }),
    }
}

impl Dfa {
    /// Serializes to the same layout [`Nfa::from_text`] reads, using the
    /// synthesized labels as state names.
    pub fn to_text(&self) -> String {
        let start_label = self
            .state(self.start_state)
            .map(DfaState::label)
            .unwrap_or_default();

        let mut text = String::new();
        text.push_str(&self.join_labels(0..self.states.len()));
        text.push('\n');
        text.push_str(start_label);
        text.push('\n');
        text.push_str(&self.join_labels(self.accept_states()));
        text.push('\n');

        for (from, symbol, to) in self.transitions() {
            // It is safe to unwrap here as writing into a String never fails
            writeln!(
                text,
                "{} {} {}",
                self.states[from].label, symbol, self.states[to].label
            )
            .unwrap();
        }

        text
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> AutomatonResult<()> {
        write_file(path.as_ref(), &self.to_text())
    }

    fn join_labels<I: IntoIterator<Item = DfaStateId>>(&self, ids: I) -> String {
        ids.into_iter()
            .map(|id| self.states[id].label.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The human readable listing printed after a conversion.
impl fmt::Display for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = self
            .states
            .iter()
            .map(|state| state.label.as_str())
            .collect::<Vec<_>>();
        let final_labels = self
            .accept_states()
            .map(|id| self.states[id].label.as_str())
            .collect::<Vec<_>>();

        writeln!(f, "DFA States:")?;
        writeln!(f, "{}", labels.join(", "))?;
        writeln!(f)?;
        writeln!(f, "DFA Final States:")?;
        writeln!(f, "{}", final_labels.join(", "))?;
        writeln!(f)?;
        write!(f, "DFA Transitions:")?;

        for (from, symbol, to) in self.transitions() {
            write!(
                f,
                "\n  {} --{}--> {}",
                self.states[from].label, symbol, self.states[to].label
            )?;
        }

        Ok(())
    }
}

/// Writes one `"<word> accepted"` / `"<word> **rejected**"` line per result.
pub fn save_results<P: AsRef<Path>>(path: P, results: &[WordResult]) -> AutomatonResult<()> {
    let text = results
        .iter()
        .map(|result| format!("{}\n", result))
        .collect::<String>();
    write_file(path.as_ref(), &text)
}

pub(crate) fn read_file(path: &Path) -> AutomatonResult<String> {
    fs::read_to_string(path).map_err(|source| AutomatonError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_file(path: &Path, contents: &str) -> AutomatonResult<()> {
    fs::write(path, contents).map_err(|source| AutomatonError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{Alphabet, AutomatonTransition::*, StateSet};

    fn set(states: &[&str]) -> StateSet {
        states.iter().map(|state| state.to_string()).collect()
    }

    #[test]
    fn from_text_unit_1() {
        let nfa = Nfa::from_text("A B C\nA\nC\nA h B\nB 1 C\nB 1 A\n", "h").unwrap();

        assert_eq!(
            nfa,
            Nfa {
                states: set(&["A", "B", "C"]),
                start_state: "A".to_string(),
                accept_states: set(&["C"]),
                transitions: BTreeMap::from([
                    ("A".to_string(), BTreeMap::from([(Epsilon, set(&["B"]))])),
                    ("B".to_string(), BTreeMap::from([(Symbol('1'), set(&["A", "C"]))])),
                ]),
            }
        );
    }

    #[test]
    fn from_text_unit_2() {
        // No final states, a blank line and a state missing from line 1
        let nfa = Nfa::from_text("q0\n  q0 \n\nq0 a q0\n\n q0   b   q1\n", "eps").unwrap();

        assert_eq!(nfa.states(), &set(&["q0", "q1"]));
        assert_eq!(nfa.start_state(), "q0");
        assert!(nfa.accept_states().is_empty());
        assert_eq!(
            nfa.transitions().collect::<Vec<_>>(),
            vec![("q0", Symbol('a'), "q0"), ("q0", Symbol('b'), "q1")]
        );
    }

    #[test]
    fn from_text_errors() {
        assert!(matches!(
            Nfa::from_text("A B\nA\n", "h"),
            Err(AutomatonError::MissingSection {
                line: 3,
                section: "final states"
            })
        ));
        assert!(matches!(
            Nfa::from_text("", "h"),
            Err(AutomatonError::MissingSection { line: 1, .. })
        ));
        assert!(matches!(
            Nfa::from_text("A B\nA B\nB\n", "h"),
            Err(AutomatonError::MalformedInitialState { line: 2, .. })
        ));
        assert!(matches!(
            Nfa::from_text("A B\n\nB\n", "h"),
            Err(AutomatonError::MalformedInitialState { line: 2, .. })
        ));
        match Nfa::from_text("A B\nA\nB\nA 0 B\nA 1\n", "h") {
            Err(AutomatonError::MalformedTransition { line, content }) => {
                assert_eq!(line, 5);
                assert_eq!(content, "A 1");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            Nfa::from_text("A B\nA\nB\nA 0 B C\n", "h"),
            Err(AutomatonError::MalformedTransition { line: 4, .. })
        ));
        assert!(matches!(
            Nfa::from_text("A B\nA\nB\nA 01 B\n", "h"),
            Err(AutomatonError::MultiCharSymbol { line: 4, .. })
        ));
    }

    #[test]
    fn from_file_missing() {
        let path = std::env::temp_dir().join("nfa2dfa-surely-missing/nfa.txt");

        match Nfa::from_file(&path, "h") {
            Err(AutomatonError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn to_text_unit_1() {
        let nfa = Nfa::from_text("A B\nA\nB\nA 0 A\nA 1 B\n", "h").unwrap();
        let dfa = nfa.to_dfa(&Alphabet::new("01".chars()));

        assert_eq!(dfa.to_text(), "A B\nA\nB\nA 0 A\nA 1 B\n");
    }

    #[test]
    fn to_text_unit_2() {
        let nfa = Nfa::from_text("A B C\nA\nC\nA h B\nB 1 C\nC 0 A\n", "h").unwrap();
        let dfa = nfa.to_dfa(&Alphabet::new("10".chars()));

        // Transitions follow the alphabet order, not the symbol order
        assert_eq!(dfa.to_text(), "AB C\nAB\nC\nAB 1 C\nC 0 AB\n");

        // The output reads back as an automaton accepting the same words
        let reread = Nfa::from_text(&dfa.to_text(), "h").unwrap();
        for word in ["1", "101", "", "0", "11", "1010"] {
            assert_eq!(reread.accepts(word), dfa.accepts(word), "{:?}", word);
        }
    }

    #[test]
    fn display_unit_1() {
        let nfa = Nfa::from_text("A B C\nA\nC\nA h B\nB 1 C\nC 0 A\n", "h").unwrap();
        let dfa = nfa.to_dfa(&Alphabet::new("01".chars()));

        assert_eq!(
            dfa.to_string(),
            "DFA States:\nAB, C\n\nDFA Final States:\nC\n\nDFA Transitions:\n  AB --1--> C\n  C --0--> AB"
        );
    }

    #[test]
    fn save_results_unit_1() {
        let path = std::env::temp_dir().join(format!("nfa2dfa-results-{}.txt", std::process::id()));
        let nfa = Nfa::from_text("A B\nA\nB\nA 0 A\nA 1 B\n", "h").unwrap();
        let dfa = nfa.to_dfa(&Alphabet::from_nfa(&nfa));

        save_results(&path, &dfa.run_words("1\n0\n01\n010\n")).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "1 accepted\n0 **rejected**\n01 accepted\n010 **rejected**\n"
        );
        let _ = fs::remove_file(&path);
    }
}
