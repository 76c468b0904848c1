use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors produced while loading, converting or saving automata.
///
/// Rejecting a word is not an error, see [`crate::MatchOutcome`].
#[derive(Debug, Error)]
pub enum AutomatonError {
    #[error("line {line}: missing {section} line")]
    MissingSection { line: usize, section: &'static str },

    #[error("line {line}: expected exactly one initial state, got {content:?}")]
    MalformedInitialState { line: usize, content: String },

    #[error("line {line}: expected `<state> <symbol> <next-state>`, got {content:?}")]
    MalformedTransition { line: usize, content: String },

    #[error("line {line}: symbol {token:?} is not a single character")]
    MultiCharSymbol { line: usize, token: String },

    #[error("symbol {0:?} is reserved for epsilon and cannot be part of the alphabet")]
    EpsilonInAlphabet(char),

    #[error("failed to render graph: {0}")]
    Render(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type AutomatonResult<T> = Result<T, AutomatonError>;
