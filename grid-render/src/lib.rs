//! FILENAME: grid-render/src/lib.rs
//! Grid render target for the export engine.
//!
//! Draws an exported table into a sparse in-memory sheet: cell values with
//! deduplicated styles, merged regions for spanning cells, column widths and
//! row heights. The sheet can be saved to and restored from JSON.

mod error;
mod format;
mod renderer;
mod sheet;
mod style;

pub use error::GridError;
pub use format::{display_value, format_number};
pub use renderer::GridRenderer;
pub use sheet::{MergedRegion, RenderedCell, RenderedSheet, SavedCell, SheetSnapshot};
pub use style::StyleRegistry;
