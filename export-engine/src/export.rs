//! FILENAME: export-engine/src/export.rs
//! PURPOSE: Drives a render target through a table export.
//! CONTEXT: `TableExport` validates the table, iterates the resolved rows and
//! forwards each table, column, row and cell to a `RenderOperations` sink.
//! Indices handed to the sink already include the table's first row and
//! first column offsets. Sinks are not rolled back when an export fails.

use model::{
    CellAttributes, CellValue, ColumnAttributes, ColumnKey, ExportSettings, RowAttributes,
    RowIndex, Table, TableAttributes,
};

use crate::error::ExportError;
use crate::iterator::RowContextIterator;
use crate::resolver::{AttributedCell, RowContextResolver};
use crate::source::RecordSource;

// ============================================================================
// RENDER CONTEXTS
// ============================================================================

pub struct TableContext<'a> {
    pub name: &'a str,
    pub first_row: usize,
    pub first_column: usize,
    pub column_count: usize,
    pub attributes: &'a TableAttributes,
}

/// When a column is rendered relative to the rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnPhase {
    BeforeFirstRow,
    AfterLastRow,
}

pub struct ColumnContext<'a, T> {
    pub key: &'a ColumnKey<T>,
    /// Absolute column index.
    pub index: usize,
    /// Position in display order.
    pub position: usize,
    /// Table column defaults merged with the column's own attributes.
    pub attributes: ColumnAttributes,
    pub phase: ColumnPhase,
}

pub struct RowContext<'a> {
    /// Absolute row index.
    pub index: usize,
    pub row_index: RowIndex,
    pub record_index: Option<usize>,
    pub attributes: &'a RowAttributes,
}

pub struct CellContext<'a, T> {
    pub key: &'a ColumnKey<T>,
    /// Absolute row index.
    pub row: usize,
    /// Absolute column index.
    pub column: usize,
    pub value: &'a CellValue,
    pub attributes: &'a CellAttributes,
}

// ============================================================================
// RENDER OPERATIONS
// ============================================================================

/// Sink receiving the resolved table in render order.
pub trait RenderOperations<T> {
    fn begin_table(&mut self, _table: &TableContext<'_>) -> Result<(), ExportError> {
        Ok(())
    }

    /// Called once per column before the first row and once after the last row.
    fn render_column(&mut self, _column: &ColumnContext<'_, T>) -> Result<(), ExportError> {
        Ok(())
    }

    fn begin_row(&mut self, _row: &RowContext<'_>) -> Result<(), ExportError> {
        Ok(())
    }

    fn render_cell(&mut self, cell: &CellContext<'_, T>) -> Result<(), ExportError>;

    fn end_row(&mut self, _row: &RowContext<'_>) -> Result<(), ExportError> {
        Ok(())
    }

    fn end_table(&mut self, _table: &TableContext<'_>) -> Result<(), ExportError> {
        Ok(())
    }
}

// ============================================================================
// EXPORT DRIVER
// ============================================================================

/// Counts of what an export forwarded to its sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub rows: usize,
    pub cells: usize,
    /// Absolute index of the last rendered row.
    pub last_row: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct TableExport {
    settings: ExportSettings,
}

impl TableExport {
    pub fn new() -> Self {
        TableExport::default()
    }

    pub fn with_settings(settings: ExportSettings) -> Self {
        TableExport { settings }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Exports `table` filled from `source` into `sink`.
    pub fn export<T, S, R>(
        &self,
        table: &Table<T>,
        source: S,
        sink: &mut R,
    ) -> Result<ExportSummary, ExportError>
    where
        S: RecordSource<T>,
        R: RenderOperations<T> + ?Sized,
    {
        let resolver = RowContextResolver::with_settings(table, source, self.settings.clone())?;
        let columns = resolver.columns().to_vec();
        let mut rows = RowContextIterator::new(resolver);

        let table_context = TableContext {
            name: &table.name,
            first_row: table.first_row,
            first_column: table.first_column,
            column_count: columns.len(),
            attributes: &table.attributes,
        };
        log::debug!(target: "EXPORT", "begin table '{}'", table.name);
        sink.begin_table(&table_context)?;
        self.render_columns(table, &columns, ColumnPhase::BeforeFirstRow, sink)?;

        let mut summary = ExportSummary::default();
        while let Some(resolved) = rows.next_row()? {
            let row = resolved.row;
            let row_context = RowContext {
                index: table.first_row + row.index.value,
                row_index: row.index,
                record_index: row.record_index,
                attributes: &row.attributes,
            };
            sink.begin_row(&row_context)?;
            for cell in &row.cells {
                sink.render_cell(&cell_context(table, row_context.index, cell))?;
            }
            sink.end_row(&row_context)?;

            summary.rows += 1;
            summary.cells += row.cells.len();
            summary.last_row = Some(row_context.index);
        }

        self.render_columns(table, &columns, ColumnPhase::AfterLastRow, sink)?;
        sink.end_table(&table_context)?;
        log::debug!(
            target: "EXPORT",
            "end table '{}': {} rows, {} cells",
            table.name,
            summary.rows,
            summary.cells
        );
        Ok(summary)
    }

    fn render_columns<T, R>(
        &self,
        table: &Table<T>,
        columns: &[&model::Column<T>],
        phase: ColumnPhase,
        sink: &mut R,
    ) -> Result<(), ExportError>
    where
        R: RenderOperations<T> + ?Sized,
    {
        for (position, column) in columns.iter().enumerate() {
            sink.render_column(&ColumnContext {
                key: &column.key,
                index: table.first_column + position,
                position,
                attributes: table.column_attributes.merge(&column.attributes),
                phase,
            })?;
        }
        Ok(())
    }
}

fn cell_context<'a, T>(
    table: &Table<T>,
    row: usize,
    cell: &'a AttributedCell<T>,
) -> CellContext<'a, T> {
    CellContext {
        key: &cell.key,
        row,
        column: table.first_column + cell.column,
        value: &cell.value,
        attributes: &cell.attributes,
    }
}
