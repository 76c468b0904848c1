mod error;
mod finite_automaton;
mod graphviz;
mod matcher;
mod text_format;

use std::collections::{BTreeMap, BTreeSet};

pub use error::{AutomatonError, AutomatonResult};
pub use matcher::{MatchOutcome, Rejection, WordResult};
pub use text_format::save_results;

pub type StateLabel = String;
pub type StateSet = BTreeSet<StateLabel>;
pub type AutomatonTransitionList = BTreeMap<AutomatonTransition, StateSet>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AutomatonTransition {
    Epsilon,
    Symbol(char),
}

// Use BTree here instead of Hash to get determenistic results every time
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Nfa {
    states: StateSet,
    start_state: StateLabel,
    accept_states: StateSet,
    transitions: BTreeMap<StateLabel, AutomatonTransitionList>,
}

/// The symbols a DFA is built over, in the order the caller enumerated them.
///
/// Epsilon is not a `char`, so it can never end up in here.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

pub type DfaStateId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaState {
    /// Canonical identity: the NFA states this DFA state stands for.
    nfa_states: StateSet,
    /// Synthesized label, only ever used for display and serialization.
    label: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Dfa {
    alphabet: Alphabet,
    states: Vec<DfaState>,
    start_state: DfaStateId,
    accept_states: BTreeSet<DfaStateId>,
    transitions: BTreeMap<DfaStateId, BTreeMap<char, DfaStateId>>,
}
