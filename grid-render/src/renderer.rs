//! FILENAME: grid-render/src/renderer.rs
//! PURPOSE: Render sink that draws an exported table into a RenderedSheet.
//! CONTEXT: Positions handed over by the export driver already include the
//! table's first row/column; the renderer adds the table margins on top.
//! Column widths marked auto are measured once the last row is drawn.

use std::collections::BTreeSet;

use export_engine::{
    CellContext, ColumnContext, ColumnPhase, ExportError, ExportSummary, RecordSource,
    RenderOperations, RowContext, TableContext, TableExport,
};
use model::{ExportSettings, Table};

use crate::error::GridError;
use crate::format::display_value;
use crate::sheet::{MergedRegion, RenderedCell, RenderedSheet};

/// Extra characters added to the widest value of an auto-sized column.
const AUTO_WIDTH_PADDING: f64 = 2.0;

#[derive(Debug, Default)]
pub struct GridRenderer {
    sheet: RenderedSheet,
    row_offset: u32,
    col_offset: u32,
    auto_columns: BTreeSet<u32>,
}

impl GridRenderer {
    pub fn new() -> Self {
        GridRenderer::default()
    }

    /// Exports `table` filled from `source` and returns the drawn sheet.
    pub fn render<T, S>(
        table: &Table<T>,
        source: S,
        settings: ExportSettings,
    ) -> Result<(RenderedSheet, ExportSummary), GridError>
    where
        S: RecordSource<T>,
    {
        let mut renderer = GridRenderer::new();
        let summary = TableExport::with_settings(settings).export(table, source, &mut renderer)?;
        Ok((renderer.into_sheet(), summary))
    }

    pub fn sheet(&self) -> &RenderedSheet {
        &self.sheet
    }

    pub fn into_sheet(self) -> RenderedSheet {
        self.sheet
    }

    fn position(&self, row: usize, col: usize) -> Result<(u32, u32), GridError> {
        let out_of_sheet = || GridError::OutOfSheet { row, col };
        let sheet_row = u32::try_from(row)
            .ok()
            .and_then(|r| r.checked_add(self.row_offset))
            .ok_or_else(out_of_sheet)?;
        let sheet_col = u32::try_from(col)
            .ok()
            .and_then(|c| c.checked_add(self.col_offset))
            .ok_or_else(out_of_sheet)?;
        Ok((sheet_row, sheet_col))
    }

    /// Widest display text in `col`, in characters.
    fn measure_column(&self, col: u32) -> Option<usize> {
        self.sheet
            .cells
            .iter()
            .filter(|((_, c), _)| *c == col)
            .map(|(_, cell)| {
                let format = self
                    .sheet
                    .styles
                    .get(cell.style_index)
                    .data_format
                    .as_ref()
                    .and_then(|f| f.number_format.as_ref());
                display_value(&cell.value, format).chars().count()
            })
            .max()
    }

    fn draw_cell<T>(&mut self, cell: &CellContext<'_, T>) -> Result<(), GridError> {
        let (row, col) = self.position(cell.row, cell.column)?;
        if cell.value.is_spanning() {
            let region =
                MergedRegion::try_new(row, col, cell.value.row_span, cell.value.col_span)
                    .ok_or(GridError::OutOfSheet {
                        row: cell.row,
                        col: cell.column,
                    })?;
            self.sheet.add_merge(region)?;
        }
        let style_index = self.sheet.styles.get_or_create(cell.attributes);
        self.sheet.set_cell(
            row,
            col,
            RenderedCell {
                value: cell.value.value.clone(),
                cell_type: cell.value.cell_type,
                style_index,
            },
        );
        Ok(())
    }

    fn draw_column<T>(&mut self, column: &ColumnContext<'_, T>) -> Result<(), GridError> {
        let (_, col) = self.position(0, column.index)?;
        let Some(width) = &column.attributes.width else {
            return Ok(());
        };

        match column.phase {
            ColumnPhase::BeforeFirstRow => {
                if width.auto == Some(true) {
                    self.auto_columns.insert(col);
                } else if let Some(points) = width.width.filter(|w| *w > 0.0) {
                    self.sheet.column_widths.insert(col, points);
                }
            }
            ColumnPhase::AfterLastRow => {
                if self.auto_columns.contains(&col) {
                    if let Some(chars) = self.measure_column(col) {
                        let measured = chars as f64 + AUTO_WIDTH_PADDING;
                        log::trace!(target: "GRID", "auto width of column {}: {}", col, measured);
                        self.sheet.column_widths.insert(col, measured);
                    }
                }
            }
        }
        Ok(())
    }
}

impl<T> RenderOperations<T> for GridRenderer {
    fn begin_table(&mut self, table: &TableContext<'_>) -> Result<(), ExportError> {
        let (top, left) = table.attributes.offsets();
        self.sheet = RenderedSheet::new(table.name);
        self.row_offset = top;
        self.col_offset = left;
        self.auto_columns.clear();
        log::debug!(
            target: "GRID",
            "drawing table '{}' at ({}, {}) with margins ({}, {})",
            table.name,
            table.first_row,
            table.first_column,
            top,
            left
        );
        Ok(())
    }

    fn render_column(&mut self, column: &ColumnContext<'_, T>) -> Result<(), ExportError> {
        self.draw_column(column).map_err(GridError::into_render)
    }

    fn begin_row(&mut self, row: &RowContext<'_>) -> Result<(), ExportError> {
        let height = row.attributes.height.as_ref().and_then(|h| h.points);
        if let Some(points) = height {
            let (sheet_row, _) = self.position(row.index, 0).map_err(GridError::into_render)?;
            self.sheet.row_heights.insert(sheet_row, points);
        }
        Ok(())
    }

    fn render_cell(&mut self, cell: &CellContext<'_, T>) -> Result<(), ExportError> {
        self.draw_cell(cell).map_err(GridError::into_render)
    }

    fn end_table(&mut self, table: &TableContext<'_>) -> Result<(), ExportError> {
        log::debug!(
            target: "GRID",
            "table '{}' drawn: {} cells, {} styles, {} merged regions",
            table.name,
            self.sheet.cell_count(),
            self.sheet.styles.len(),
            self.sheet.merges.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use export_engine::IterSource;
    use model::{CellDef, Column, ColumnWidth, RowDef};

    fn create_test_table() -> Table<u32> {
        Table::new()
            .with_column(Column::property("n", |n: &u32| *n).with(ColumnWidth::auto()))
            .with_column(Column::new("note").with(ColumnWidth::fixed(30.0)))
            .with_row(RowDef::at(0).with_cell("n", CellDef::value("Number")))
    }

    #[test]
    fn test_render_fills_sheet() {
        let table = create_test_table();
        let data = vec![7u32, 12345];
        let (sheet, summary) =
            GridRenderer::render(&table, IterSource::new(data.iter()), ExportSettings::default())
                .unwrap();

        assert_eq!(summary.rows, 3);
        assert_eq!(sheet.display(0, 0).as_deref(), Some("Number"));
        assert_eq!(sheet.display(2, 0).as_deref(), Some("12345"));
        assert_eq!(sheet.get_cell(1, 1), None);
        assert_eq!(sheet.column_widths.get(&1), Some(&30.0));
        // "Number" is the widest value of the auto column
        assert_eq!(sheet.column_widths.get(&0), Some(&8.0));
    }

    #[test]
    fn test_out_of_sheet_position() {
        let renderer = GridRenderer {
            row_offset: 1,
            ..GridRenderer::default()
        };
        let result = renderer.position(u32::MAX as usize, 0);
        assert!(matches!(result, Err(GridError::OutOfSheet { .. })));
    }

    #[test]
    fn test_span_past_sheet_end_is_error() {
        let table = create_test_table().with_row(
            RowDef::at(2).with_cell("note", CellDef::value("tall").with_row_span(u32::MAX)),
        );
        let result =
            GridRenderer::render(&table, IterSource::new(Vec::<u32>::new().iter()), ExportSettings::default());

        match result {
            Err(GridError::Export(ExportError::Render(message))) => {
                assert!(message.contains("outside the sheet"), "{}", message);
            }
            other => panic!("expected out-of-sheet error, got ok={}", other.is_ok()),
        }
    }
}
