use std::fmt;

use log::debug;

use super::{Dfa, DfaStateId, Nfa};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Accepted,
    Rejected(Rejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No transition on `symbol`, the symbol at `position` (counted in chars).
    /// Nothing after it was read.
    NoTransition { position: usize, symbol: char },
    /// The whole word was read but `state` is not accepting.
    NotAccepting { state: DfaStateId },
}

impl MatchOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Outcome of running one line of a words file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordResult {
    pub word: String,
    pub outcome: MatchOutcome,
}

impl fmt::Display for WordResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            MatchOutcome::Accepted => write!(f, "{} accepted", self.word),
            MatchOutcome::Rejected(_) => write!(f, "{} **rejected**", self.word),
        }
    }
}

impl Dfa {
    pub fn run<I: IntoIterator<Item = char>>(&self, word: I) -> MatchOutcome {
        let mut curr_state = self.start_state;

        for (position, symbol) in word.into_iter().enumerate() {
            curr_state = match self.transition(curr_state, symbol) {
                Some(next_state) => next_state,
                None => {
                    return MatchOutcome::Rejected(Rejection::NoTransition { position, symbol })
                }
            };
        }

        if self.is_accepting(curr_state) {
            MatchOutcome::Accepted
        } else {
            MatchOutcome::Rejected(Rejection::NotAccepting { state: curr_state })
        }
    }

    pub fn accepts(&self, word: &str) -> bool {
        self.run(word.chars()).is_accepted()
    }

    /// Runs every line of `words` as a separate word, whitespace trimmed,
    /// keeping the input order.
    pub fn run_words(&self, words: &str) -> Vec<WordResult> {
        words
            .lines()
            .map(|line| {
                let word = line.trim();
                let outcome = self.run(word.chars());
                debug!("{:?}: {:?}", word, outcome);
                WordResult {
                    word: word.to_string(),
                    outcome,
                }
            })
            .collect()
    }
}

impl Nfa {
    /// Simulates the NFA directly by tracking the set of states it can be in.
    pub fn accepts(&self, word: &str) -> bool {
        let mut curr_states = self.epsilon_closure(&self.start_state);

        for symbol in word.chars() {
            curr_states = self.move_on_symbol(&curr_states, symbol);
            if curr_states.is_empty() {
                return false;
            }
        }

        !curr_states.is_disjoint(&self.accept_states)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{Alphabet, AutomatonTransition::*};

    fn scenario_1() -> Dfa {
        let mut nfa = Nfa::new("A");
        nfa.add_accept_state("B");
        nfa.add_transition("A", Symbol('0'), "A");
        nfa.add_transition("A", Symbol('1'), "B");
        nfa.to_dfa(&Alphabet::new("01".chars()))
    }

    #[test]
    fn run_unit_1() {
        let dfa = scenario_1();

        assert_eq!(dfa.run("1".chars()), MatchOutcome::Accepted);
        assert_eq!(dfa.run("0001".chars()), MatchOutcome::Accepted);
        assert_eq!(
            dfa.run("0".chars()),
            MatchOutcome::Rejected(Rejection::NotAccepting { state: 0 })
        );
        assert_eq!(
            dfa.run("01".chars().chain("0".chars())),
            MatchOutcome::Rejected(Rejection::NoTransition {
                position: 2,
                symbol: '0'
            })
        );
        assert_eq!(
            dfa.run("".chars()),
            MatchOutcome::Rejected(Rejection::NotAccepting { state: 0 })
        );
        assert_eq!(
            dfa.run("2".chars()),
            MatchOutcome::Rejected(Rejection::NoTransition {
                position: 0,
                symbol: '2'
            })
        );
    }

    #[test]
    fn run_unit_2() {
        let mut nfa = Nfa::new("A");
        nfa.add_state("B");
        nfa.add_accept_state("C");
        nfa.add_transition("A", Epsilon, "B");
        nfa.add_transition("B", Symbol('1'), "C");
        let dfa = nfa.to_dfa(&Alphabet::new("01".chars()));

        assert!(dfa.accepts("1"));
        assert!(!dfa.accepts(""));
        assert!(!dfa.accepts("11"));
        assert!(!dfa.accepts("0"));
    }

    #[test]
    fn run_stops_at_missing_transition() {
        let dfa = scenario_1();
        let consumed = Cell::new(0);

        let outcome = dfa.run("1011".chars().inspect(|_| consumed.set(consumed.get() + 1)));

        assert_eq!(
            outcome,
            MatchOutcome::Rejected(Rejection::NoTransition {
                position: 1,
                symbol: '0'
            })
        );
        assert_eq!(consumed.get(), 2);
    }

    #[test]
    fn run_with_empty_label() {
        // The start state is labeled "", it is still a real state
        let mut nfa = Nfa::new("");
        nfa.add_accept_state("");
        nfa.add_transition("", Symbol('a'), "");
        let dfa = nfa.to_dfa(&Alphabet::new("ab".chars()));

        assert_eq!(dfa.states()[dfa.start_state()].label(), "");
        assert!(dfa.accepts(""));
        assert!(dfa.accepts("aaa"));
        assert!(!dfa.accepts("ab"));
    }

    #[test]
    fn run_words_unit_1() {
        let dfa = scenario_1();

        let results = dfa.run_words("1\n0\n  01 \n\n001\n10\n");

        assert_eq!(
            results.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec![
                "1 accepted",
                "0 **rejected**",
                "01 accepted",
                " **rejected**",
                "001 accepted",
                "10 **rejected**",
            ]
        );
        // "10" dies on the missing 0 transition out of B
        assert_eq!(
            results[5].outcome,
            MatchOutcome::Rejected(Rejection::NoTransition {
                position: 1,
                symbol: '0'
            })
        );
    }

    #[test]
    fn nfa_accepts_unit_1() {
        let mut nfa = Nfa::new("q0");
        nfa.add_accept_state("q2");
        nfa.add_transition("q0", Symbol('a'), "q0");
        nfa.add_transition("q0", Symbol('b'), "q0");
        nfa.add_transition("q0", Symbol('a'), "q1");
        nfa.add_transition("q1", Symbol('b'), "q2");

        assert!(nfa.accepts("ab"));
        assert!(nfa.accepts("bbaab"));
        assert!(!nfa.accepts("aba"));
        assert!(!nfa.accepts(""));
    }
}
