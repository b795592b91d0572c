//! FILENAME: model/src/settings.rs
//! PURPOSE: Export-wide configuration defaults.
//! CONTEXT: Settings are plain serde data so they can be loaded from JSON;
//! every field has a default, so a partial document is valid.

use serde::{Deserialize, Serialize};

use crate::definition::RowSpanStrategy;
use crate::error::ModelError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Name given to tables that are not named explicitly.
    pub default_table_name: String,
    pub first_row: usize,
    pub first_column: usize,
    /// Strategy for spanning cells that don't declare one.
    pub default_row_span_strategy: RowSpanStrategy,
    /// Reuse merged row definitions when the same set of definitions matches again.
    pub cache_synthetic_rows: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            default_table_name: "untitled".to_string(),
            first_row: 0,
            first_column: 0,
            default_row_span_strategy: RowSpanStrategy::Shadow,
            cache_synthetic_rows: true,
        }
    }
}

impl ExportSettings {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_default_row_span_strategy(mut self, strategy: RowSpanStrategy) -> Self {
        self.default_row_span_strategy = strategy;
        self
    }

    pub fn with_cache_synthetic_rows(mut self, cache: bool) -> Self {
        self.cache_synthetic_rows = cache;
        self
    }
}
