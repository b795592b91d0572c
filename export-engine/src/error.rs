//! FILENAME: export-engine/src/error.rs

use model::{EvalError, ModelError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid table: {0}")]
    Model(#[from] ModelError),

    #[error("Evaluation failed at row {row}: {source}")]
    Evaluation {
        row: usize,
        #[source]
        source: EvalError,
    },

    #[error("Row span of {span} at row {row}, column '{column}' collides with row {collides_with}")]
    SpanCollision {
        row: usize,
        column: String,
        span: u32,
        collides_with: usize,
    },

    #[error("Render error: {0}")]
    Render(String),
}

impl ExportError {
    pub(crate) fn evaluation(row: usize, source: EvalError) -> Self {
        ExportError::Evaluation { row, source }
    }
}
