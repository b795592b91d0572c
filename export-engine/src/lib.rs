//! FILENAME: export-engine/src/lib.rs
//! Export engine - turns a table model and a record collection into attributed rows.
//!
//! This crate resolves, row by row, what a render target has to draw: which
//! row definitions apply, how their cells and attributes merge, which value
//! each cell shows, and how spanning cells affect the rows below them.
//!
//! Layers:
//! - `rows`: Row definitions indexed by anchor and predicate
//! - `merge`: Synthetic rows merged from matched definitions, cell value sources
//! - `spans`: Row/column span bookkeeping
//! - `source`: Record suppliers (streaming and buffered)
//! - `resolver`: The row context resolver (WHAT row comes next)
//! - `iterator`: Pull-based iteration with lookahead
//! - `export`: Export driver and the render sink trait

pub mod error;
pub mod export;
pub mod iterator;
pub mod merge;
pub mod resolver;
pub mod rows;
pub mod source;
pub mod spans;

pub use error::ExportError;
pub use export::{
    CellContext, ColumnContext, ColumnPhase, ExportSummary, RenderOperations, RowContext,
    TableContext, TableExport,
};
pub use iterator::RowContextIterator;
pub use merge::{QualifiedRows, SyntheticRow, ValueSource};
pub use resolver::{AttributedCell, AttributedRow, ResolvedRow, RowContextResolver};
pub use rows::{IndexedTableRows, MatchedRows};
pub use source::{BufferedSource, IndexedRecord, IterSource, RecordSource};
pub use spans::{SpanClaim, SpanTracker};
