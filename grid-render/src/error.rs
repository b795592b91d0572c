//! FILENAME: grid-render/src/error.rs

use export_engine::ExportError;
use thiserror::Error;

use crate::sheet::MergedRegion;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Merged region at ({row}, {col}) overlaps {existing:?}")]
    OverlappingMerge {
        row: u32,
        col: u32,
        existing: MergedRegion,
    },

    #[error("Position ({row}, {col}) is outside the sheet")]
    OutOfSheet { row: usize, col: usize },

    #[error("Sheet serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GridError {
    /// Wraps the error for the render sink, which can only report `ExportError`.
    pub(crate) fn into_render(self) -> ExportError {
        match self {
            GridError::Export(inner) => inner,
            other => ExportError::Render(other.to_string()),
        }
    }
}
