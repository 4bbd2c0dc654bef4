use thiserror::Error;

/// Errors produced by type construction and parsing.
#[derive(Debug, Error, PartialEq)]
pub enum TypeError {
    #[error("invalid code {0:?}: expected exactly 6 ASCII digits")]
    InvalidCode(String),

    #[error("invalid reaction time {0}: expected a finite value in (0, 3000] ms")]
    InvalidReactionTime(f64),

    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },
}
