//! Learner-level errors.

use thiserror::Error;

pub type LearnerResult<T> = Result<T, LearnerError>;

#[derive(Debug, Error)]
pub enum LearnerError {
    #[error("checkpoint io: {0}")]
    Io(#[from] std::io::Error),

    #[error("checkpoint encode/decode: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("observation length {got} does not match the learner's width {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("checkpoint shape mismatch: {0}")]
    BadCheckpoint(String),
}
