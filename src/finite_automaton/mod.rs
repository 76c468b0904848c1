use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, info, trace, warn};

use super::{
    Alphabet, AutomatonError, AutomatonResult, AutomatonTransition, AutomatonTransitionList,
    Dfa, DfaState, DfaStateId, Nfa, StateLabel, StateSet,
};

impl Nfa {
    pub fn new(start_state: &str) -> Self {
        let mut nfa = Self {
            start_state: start_state.to_string(),
            ..Self::default()
        };
        nfa.add_state(start_state);
        nfa
    }

    pub fn add_state(&mut self, state: &str) {
        if !self.states.contains(state) {
            self.states.insert(state.to_string());
        }
    }

    pub fn add_accept_state(&mut self, state: &str) {
        self.add_state(state);
        self.accept_states.insert(state.to_string());
    }

    pub fn add_transition(&mut self, from: &str, transition: AutomatonTransition, to: &str) {
        self.add_state(from);
        self.add_state(to);
        self.transitions
            .entry(from.to_string())
            .or_insert_with(AutomatonTransitionList::default)
            .entry(transition)
            .or_insert_with(StateSet::default)
            .insert(to.to_string());
    }

    pub fn states(&self) -> &StateSet {
        &self.states
    }

    pub fn start_state(&self) -> &str {
        &self.start_state
    }

    pub fn accept_states(&self) -> &StateSet {
        &self.accept_states
    }

    /// Iterates over every `(from, transition, to)` triple, ordered by source state.
    pub fn transitions(&self) -> impl Iterator<Item = (&str, AutomatonTransition, &str)> + '_ {
        self.transitions.iter().flat_map(|(from, list)| {
            list.iter().flat_map(move |(transition, targets)| {
                targets
                    .iter()
                    .map(move |to| (from.as_str(), *transition, to.as_str()))
            })
        })
    }

    fn targets<'a>(
        &'a self,
        state: &str,
        transition: AutomatonTransition,
    ) -> impl Iterator<Item = &'a StateLabel> + 'a {
        self.transitions
            .get(state)
            .and_then(|list| list.get(&transition))
            .into_iter()
            .flatten()
    }

    /// All states reachable from `state` through epsilon transitions only,
    /// `state` itself included.
    pub fn epsilon_closure(&self, state: &str) -> StateSet {
        self.epsilon_closure_of_set(&StateSet::from([state.to_string()]))
    }

    pub fn epsilon_closure_of_set(&self, states: &StateSet) -> StateSet {
        let mut closure = states.clone();
        let mut stack: Vec<&StateLabel> = states.iter().collect();

        while let Some(curr_state) = stack.pop() {
            for next_state in self.targets(curr_state, AutomatonTransition::Epsilon) {
                if closure.insert(next_state.clone()) {
                    stack.push(next_state);
                }
            }
        }

        trace!("epsilon closure of {:?} is {:?}", states, closure);
        closure
    }

    /// Epsilon closure of every state reachable from `states` by one `symbol` step.
    pub fn move_on_symbol(&self, states: &StateSet, symbol: char) -> StateSet {
        let reached = states
            .iter()
            .flat_map(|state| self.targets(state, AutomatonTransition::Symbol(symbol)))
            .cloned()
            .collect::<StateSet>();

        if reached.is_empty() {
            return reached;
        }

        self.epsilon_closure_of_set(&reached)
    }

    pub fn to_dfa(&self, alphabet: &Alphabet) -> Dfa {
        Dfa::from_nfa(self, alphabet)
    }
}

impl Alphabet {
    /// Keeps the first occurrence of each symbol and drops the rest.
    pub fn new<I: IntoIterator<Item = char>>(symbols: I) -> Self {
        let mut seen = HashSet::new();
        let symbols = symbols
            .into_iter()
            .filter(|symbol| seen.insert(*symbol))
            .collect();
        Self { symbols }
    }

    /// Every non-epsilon symbol used by `nfa`, in sorted order.
    pub fn from_nfa(nfa: &Nfa) -> Self {
        let mut symbols = nfa
            .transitions()
            .filter_map(|(_, transition, _)| match transition {
                AutomatonTransition::Symbol(symbol) => Some(symbol),
                AutomatonTransition::Epsilon => None,
            })
            .collect::<Vec<_>>();
        symbols.sort_unstable();
        Self::new(symbols)
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }

    /// Fails if the single-character `epsilon_token` would also be read as
    /// an ordinary symbol of this alphabet.
    pub fn ensure_excludes(&self, epsilon_token: &str) -> AutomatonResult<()> {
        let mut chars = epsilon_token.chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) if self.contains(symbol) => {
                Err(AutomatonError::EpsilonInAlphabet(symbol))
            }
            _ => Ok(()),
        }
    }
}

/// Hands out display labels, making sure no two DFA states share one.
#[derive(Debug, Default)]
struct LabelRegistry {
    used: HashSet<String>,
}

impl LabelRegistry {
    fn synthesize(&mut self, nfa_states: &StateSet) -> String {
        let natural = nfa_states.iter().map(String::as_str).collect::<String>();
        let mut label = natural.clone();

        while self.used.contains(&label) {
            label.push('\'');
        }

        if label != natural {
            warn!(
                "label {:?} of {:?} is already taken, using {:?}",
                natural, nfa_states, label
            );
        }

        self.used.insert(label.clone());
        label
    }
}

impl Dfa {
    pub fn from_nfa(nfa: &Nfa, alphabet: &Alphabet) -> Self {
        let mut dfa = Self {
            alphabet: alphabet.clone(),
            ..Self::default()
        };
        let mut labels = LabelRegistry::default();
        let mut queue = VecDeque::<DfaStateId>::new();
        let mut reverse_mapping = HashMap::<StateSet, DfaStateId>::new();

        let start_closure = nfa.epsilon_closure(nfa.start_state());
        dfa.start_state = dfa.new_state(start_closure.clone(), &mut labels);
        reverse_mapping.insert(start_closure, dfa.start_state);
        queue.push_back(dfa.start_state);

        while let Some(curr_state) = queue.pop_front() {
            for &symbol in alphabet.symbols() {
                let nfa_to = nfa.move_on_symbol(&dfa.states[curr_state].nfa_states, symbol);

                // Nothing fires on this symbol, the word gets rejected here
                if nfa_to.is_empty() {
                    continue;
                }

                let dfa_to = match reverse_mapping.get(&nfa_to) {
                    Some(mapped_dfa) => *mapped_dfa,
                    None => {
                        let new_dfa = dfa.new_state(nfa_to.clone(), &mut labels);
                        reverse_mapping.insert(nfa_to, new_dfa);
                        queue.push_back(new_dfa);
                        new_dfa
                    }
                };

                debug!(
                    "{} --{}--> {}",
                    dfa.states[curr_state].label, symbol, dfa.states[dfa_to].label
                );
                dfa.transitions
                    .entry(curr_state)
                    .or_default()
                    .insert(symbol, dfa_to);
            }
        }

        dfa.accept_states = dfa
            .states
            .iter()
            .enumerate()
            .filter(|(_, state)| !state.nfa_states.is_disjoint(nfa.accept_states()))
            .map(|(id, _)| id)
            .collect();

        info!(
            "built DFA with {} states ({} accepting) from NFA with {} states",
            dfa.states.len(),
            dfa.accept_states.len(),
            nfa.states().len()
        );

        dfa
    }

    fn new_state(&mut self, nfa_states: StateSet, labels: &mut LabelRegistry) -> DfaStateId {
        let id = self.states.len();
        let label = labels.synthesize(&nfa_states);
        debug!("new DFA state {} {:?} for {:?}", id, label, nfa_states);
        self.states.push(DfaState { nfa_states, label });
        id
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// States in discovery order; a state's position is its id.
    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    pub fn state(&self, id: DfaStateId) -> Option<&DfaState> {
        self.states.get(id)
    }

    pub fn start_state(&self) -> DfaStateId {
        self.start_state
    }

    pub fn is_accepting(&self, id: DfaStateId) -> bool {
        self.accept_states.contains(&id)
    }

    pub fn accept_states(&self) -> impl Iterator<Item = DfaStateId> + '_ {
        self.accept_states.iter().copied()
    }

    pub fn transition(&self, from: DfaStateId, symbol: char) -> Option<DfaStateId> {
        self.transitions.get(&from)?.get(&symbol).copied()
    }

    /// Every recorded `(from, symbol, to)`, by source state and then in
    /// alphabet order.
    pub fn transitions(&self) -> impl Iterator<Item = (DfaStateId, char, DfaStateId)> + '_ {
        (0..self.states.len()).flat_map(move |from| {
            self.alphabet
                .symbols()
                .iter()
                .filter_map(move |&symbol| Some((from, symbol, self.transition(from, symbol)?)))
        })
    }

    pub fn find_by_nfa_states(&self, nfa_states: &StateSet) -> Option<DfaStateId> {
        self.states
            .iter()
            .position(|state| &state.nfa_states == nfa_states)
    }
}

impl DfaState {
    pub fn nfa_states(&self) -> &StateSet {
        &self.nfa_states
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
