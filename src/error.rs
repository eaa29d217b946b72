use thiserror::Error;

use crate::game::{Player, Seat};

#[derive(Error, Debug)]
pub enum SeqFormError {
    #[error("Information set {obs} of {player} presents actions {found} but {expected} were frozen at discovery")]
    ActionMismatch {
        player: Seat,
        obs: String,
        expected: String,
        found: String,
    },

    #[error("Information set {obs} of {player} re-entered from a different own sequence (perfect recall broken)")]
    ParentMismatch { player: Seat, obs: String },

    #[error("Non-terminal state of {player} has no legal actions")]
    NoLegalActions { player: Player },

    #[error("State contract returned nothing for {operation} at a {context} node")]
    OutOfContext {
        operation: &'static str,
        context: String,
    },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SeqFormResult<T> = Result<T, SeqFormError>;
