//! FILENAME: model/src/error.rs

use thiserror::Error;

/// Configuration errors detected before any row is resolved.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Duplicate column key: {0}")]
    DuplicateColumn(String),

    #[error("Cell references unknown column: {0}")]
    UnknownColumn(String),

    #[error("Invalid span on column {column}: spans must be at least 1")]
    InvalidSpan { column: String },

    #[error("Invalid row range: {start}..={end}")]
    InvalidRange { start: usize, end: usize },

    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Failure raised by a user supplied expression or predicate.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct EvalError {
    pub message: String,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        EvalError {
            message: message.into(),
        }
    }
}
