//! FILENAME: export-engine/src/resolver.rs
//! PURPOSE: Decides, for each requested row index, which row to render next.
//! CONTEXT: This is the core of the export engine. For every requested index
//! the resolver emits either a custom row (a definition is anchored there),
//! a collection row (the next record, styled by matching predicates), or a
//! custom row further down when the records are exhausted. Row spans are
//! tracked across calls and can shadow, skip, push back or reject the rows
//! they cover.
//!
//! The resolver owns its record cursor, anchor index, synthetic row cache and
//! span state. It borrows the table, which is never mutated.

use std::borrow::Borrow;

use model::{
    CellAttributes, CellValue, Column, ColumnKey, ExportSettings, RowAttributes, RowIndex,
    RowSpanStrategy, SourceRow, Table,
};

use crate::error::ExportError;
use crate::merge::{resolve_value, value_sources, QualifiedRows};
use crate::rows::IndexedTableRows;
use crate::source::RecordSource;
use crate::spans::{governing_claim, SpanClaim, SpanTracker};

// ============================================================================
// OUTPUT
// ============================================================================

/// A resolved cell with its final value and merged attributes.
pub struct AttributedCell<T> {
    pub key: ColumnKey<T>,
    /// Position of the column in display order.
    pub column: usize,
    pub value: CellValue,
    pub attributes: CellAttributes,
}

impl<T> Clone for AttributedCell<T> {
    fn clone(&self) -> Self {
        AttributedCell {
            key: self.key.clone(),
            column: self.column,
            value: self.value.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

impl<T> std::fmt::Debug for AttributedCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributedCell")
            .field("key", &self.key)
            .field("column", &self.column)
            .field("value", &self.value)
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// A resolved row. Cells are in column order; covered or empty columns are absent.
pub struct AttributedRow<T> {
    pub index: RowIndex,
    /// Collection position of the record that filled the row, if any.
    pub record_index: Option<usize>,
    pub attributes: RowAttributes,
    pub cells: Vec<AttributedCell<T>>,
}

impl<T> AttributedRow<T> {
    /// Cell of the column named `name`.
    pub fn cell(&self, name: &str) -> Option<&AttributedCell<T>> {
        self.cells.iter().find(|c| c.key.name() == name)
    }

    pub fn is_custom(&self) -> bool {
        self.record_index.is_none()
    }
}

impl<T> Clone for AttributedRow<T> {
    fn clone(&self) -> Self {
        AttributedRow {
            index: self.index,
            record_index: self.record_index,
            attributes: self.attributes.clone(),
            cells: self.cells.clone(),
        }
    }
}

impl<T> std::fmt::Debug for AttributedRow<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributedRow")
            .field("index", &self.index)
            .field("record_index", &self.record_index)
            .field("attributes", &self.attributes)
            .field("cells", &self.cells)
            .finish()
    }
}

/// Result of one resolution step.
pub struct ResolvedRow<T> {
    pub row: AttributedRow<T>,
    /// Index to request next.
    pub next_index: RowIndex,
}

impl<T> Clone for ResolvedRow<T> {
    fn clone(&self) -> Self {
        ResolvedRow {
            row: self.row.clone(),
            next_index: self.next_index,
        }
    }
}

impl<T> std::fmt::Debug for ResolvedRow<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedRow")
            .field("row", &self.row)
            .field("next_index", &self.next_index)
            .finish()
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

pub struct RowContextResolver<'t, T, S> {
    table: &'t Table<T>,
    columns: Vec<&'t Column<T>>,
    rows: IndexedTableRows<'t, T>,
    cache: QualifiedRows<T>,
    spans: SpanTracker,
    source: S,
    settings: ExportSettings,
}

impl<'t, T, S: RecordSource<T>> RowContextResolver<'t, T, S> {
    pub fn new(table: &'t Table<T>, source: S) -> Result<Self, ExportError> {
        RowContextResolver::with_settings(table, source, ExportSettings::default())
    }

    /// Validates `table` and prepares the row index.
    pub fn with_settings(
        table: &'t Table<T>,
        source: S,
        settings: ExportSettings,
    ) -> Result<Self, ExportError> {
        table.validate()?;
        let rows = IndexedTableRows::new(table)?;
        log::debug!(
            target: "RESOLVER",
            "table '{}': {} columns, {} row definitions, {} anchors",
            table.name,
            table.columns().len(),
            table.rows().len(),
            rows.anchor_count()
        );
        Ok(RowContextResolver {
            table,
            columns: table.columns(),
            rows,
            cache: QualifiedRows::new(settings.cache_synthetic_rows),
            spans: SpanTracker::new(),
            source,
            settings,
        })
    }

    pub fn table(&self) -> &'t Table<T> {
        self.table
    }

    pub fn columns(&self) -> &[&'t Column<T>] {
        &self.columns
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Resolves the next row to render at or after `requested`.
    /// Returns `Ok(None)` once there is nothing left to render.
    pub fn resolve(&mut self, requested: RowIndex) -> Result<Option<ResolvedRow<T>>, ExportError> {
        if self.rows.has_rows_at(requested.def()) {
            return self.resolve_row(requested, None, None).map(Some);
        }

        if let Some(indexed) = self.source.next_record() {
            let record: &T = indexed.record.borrow();
            return self
                .resolve_row(requested, Some(indexed.index), Some(record))
                .map(Some);
        }

        if let Some(anchor) = self.rows.next_anchor_after(requested.def()) {
            let index = requested + anchor;
            log::debug!(target: "RESOLVER", "gap jump from {} to {}", requested, index);
            return self.resolve_row(index, None, None).map(Some);
        }

        log::debug!(target: "RESOLVER", "end of rows at {}", requested);
        Ok(None)
    }

    fn resolve_row(
        &mut self,
        index: RowIndex,
        record_index: Option<usize>,
        record: Option<&T>,
    ) -> Result<ResolvedRow<T>, ExportError> {
        let source_row = SourceRow {
            row_index: index,
            record_index,
            record,
        };
        let matched = self
            .rows
            .select(&source_row)
            .map_err(|e| ExportError::evaluation(index.value, e))?;
        let synthetic = self.cache.get(self.table, &self.columns, &matched);

        self.spans.prune(index.value);

        let mut cells = Vec::with_capacity(self.columns.len());
        let mut claims = Vec::new();
        let mut covered_until = 0;

        for position in 0..self.columns.len() {
            let column = self.columns[position];
            if position < covered_until || self.spans.is_shadowed(index.value, position) {
                continue;
            }

            let cell_def = synthetic.cell(position);
            let sources = value_sources(cell_def, column);
            let Some(value) = resolve_value(&sources, column, &source_row)
                .map_err(|e| ExportError::evaluation(index.value, e))?
            else {
                continue;
            };

            let col_span = self.fit_col_span(
                index.value,
                position,
                cell_def.and_then(|c| c.col_span).unwrap_or(1),
            );
            let row_span = cell_def.and_then(|c| c.row_span).unwrap_or(1);
            let cell_type = cell_def
                .and_then(|c| c.cell_type)
                .or(column.cell_type);

            if col_span > 1 {
                covered_until = position + col_span as usize;
            }
            if row_span > 1 {
                claims.push((
                    position,
                    SpanClaim {
                        column: column.name().to_string(),
                        span: row_span,
                        strategy: cell_def
                            .and_then(|c| c.row_span_strategy)
                            .unwrap_or(self.settings.default_row_span_strategy),
                    },
                ));
            }

            cells.push(AttributedCell {
                key: column.key.clone(),
                column: position,
                value: CellValue::new(value)
                    .with_type(cell_type)
                    .with_spans(col_span, row_span),
                attributes: synthetic.cell_attributes(position).clone(),
            });
        }

        let governing = governing_claim(claims.iter().map(|(_, claim)| claim.clone()));
        if let Some(claim) = &governing {
            if claim.strategy == RowSpanStrategy::Throw {
                if let Some(collides_with) = self.find_collision(index, claim.span) {
                    log::warn!(
                        target: "RESOLVER",
                        "row span {} at row {} column '{}' collides with row {}",
                        claim.span,
                        index,
                        claim.column,
                        collides_with
                    );
                    return Err(ExportError::SpanCollision {
                        row: index.value,
                        column: claim.column.clone(),
                        span: claim.span,
                        collides_with,
                    });
                }
            }
        }

        for (position, cell) in cells.iter().map(|c| (c.column, &c.value)) {
            self.spans
                .register(index.value, position, cell.col_span, cell.row_span);
        }

        let next_index = match governing {
            Some(claim) => self.advance(index, &claim),
            None => index.next(),
        };

        log::debug!(
            target: "RESOLVER",
            "row {} resolved: {} cells, record {:?}, {} definitions, next {}",
            index,
            cells.len(),
            record_index,
            matched.len(),
            next_index
        );

        Ok(ResolvedRow {
            row: AttributedRow {
                index,
                record_index,
                attributes: synthetic.attributes.clone(),
                cells,
            },
            next_index,
        })
    }

    /// Column span of a cell at `position`, cut at the last column and at the
    /// first column still shadowed by a row span from above.
    fn fit_col_span(&self, row: usize, position: usize, requested: u32) -> u32 {
        let available = self.columns.len() - position;
        let wanted = (requested.max(1) as usize).min(available);
        let fitted = (1..wanted)
            .find(|offset| self.spans.is_shadowed(row, position + offset))
            .unwrap_or(wanted);
        if fitted < requested as usize {
            log::trace!(
                target: "RESOLVER",
                "column span {} at row {} column {} cut to {}",
                requested,
                row,
                position,
                fitted
            );
        }
        fitted as u32
    }

    /// Index following a row governed by a row-spanning cell.
    fn advance(&mut self, index: RowIndex, claim: &SpanClaim) -> RowIndex {
        let span = claim.span as usize;
        match claim.strategy {
            RowSpanStrategy::Shadow | RowSpanStrategy::Throw => index.next(),
            RowSpanStrategy::Skip => index.advance(span),
            RowSpanStrategy::Pushback => {
                log::warn!(
                    target: "RESOLVER",
                    "row span {} at row {} pushes anchored rows back by {}",
                    claim.span,
                    index,
                    span
                );
                self.rows.push_back(index.def(), span);
                index.advance(span)
            }
        }
    }

    /// First row that would be rendered inside the span of a cell at `index`.
    fn find_collision(&mut self, index: RowIndex, span: u32) -> Option<usize> {
        let span = span as usize;
        for offset in 1..span {
            if self.rows.has_rows_at(index.advance(offset).def()) {
                return Some(index.value + offset);
            }
        }
        if self.source.has_remaining() {
            return Some(index.value + 1);
        }
        let probe = index.next();
        let landing = probe + self.rows.next_anchor_after(probe.def())?;
        (landing.value < index.value.saturating_add(span)).then_some(landing.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::IterSource;
    use model::{predicates, CellDef, RowDef, Value};

    fn create_test_table() -> Table<u32> {
        Table::new()
            .with_column(Column::property("n", |n: &u32| *n))
            .with_column(Column::new("label"))
    }

    #[test]
    fn test_collection_rows_in_order() {
        let table = create_test_table();
        let data = vec![10u32, 20];
        let mut resolver = RowContextResolver::new(&table, IterSource::new(data.iter())).unwrap();

        let first = resolver.resolve(RowIndex::zero()).unwrap().unwrap();
        assert_eq!(first.row.record_index, Some(0));
        assert_eq!(first.row.cell("n").unwrap().value.value, Value::from(10));
        assert!(first.row.cell("label").is_none());

        let second = resolver.resolve(first.next_index).unwrap().unwrap();
        assert_eq!(second.row.index, RowIndex::new(1));
        assert!(resolver.resolve(second.next_index).unwrap().is_none());
    }

    #[test]
    fn test_cell_type_falls_back_to_column() {
        let table: Table<u32> = Table::new()
            .with_column(Column::property("n", |n: &u32| *n).with_type(model::CellType::Numeric))
            .with_row(
                RowDef::at(0).with_cell("n", CellDef::value("N").with_type(model::CellType::Text)),
            );
        let data = vec![1u32];
        let mut resolver = RowContextResolver::new(&table, IterSource::new(data.iter())).unwrap();

        let header = resolver.resolve(RowIndex::zero()).unwrap().unwrap();
        assert_eq!(
            header.row.cell("n").unwrap().value.cell_type,
            Some(model::CellType::Text)
        );
        let body = resolver.resolve(header.next_index).unwrap().unwrap();
        assert_eq!(
            body.row.cell("n").unwrap().value.cell_type,
            Some(model::CellType::Numeric)
        );
    }

    #[test]
    fn test_invalid_table_rejected() {
        let table = create_test_table()
            .with_row(RowDef::matching(predicates::all()).with_cell("missing", CellDef::value(1)));
        let result = RowContextResolver::new(&table, IterSource::new(Vec::<u32>::new()));
        assert!(matches!(result, Err(ExportError::Model(_))));
    }

    #[test]
    fn test_col_span_suppresses_following_columns() {
        let table = create_test_table().with_row(
            RowDef::at(0)
                .with_cell("n", CellDef::value("wide").with_col_span(2))
                .with_cell("label", CellDef::value("hidden")),
        );
        let mut resolver =
            RowContextResolver::new(&table, IterSource::new(Vec::<u32>::new())).unwrap();

        let row = resolver.resolve(RowIndex::zero()).unwrap().unwrap().row;
        assert_eq!(row.cells.len(), 1);
        assert_eq!(row.cells[0].value.col_span, 2);
    }

    #[test]
    fn test_col_span_clamped_to_last_column() {
        let table = create_test_table().with_row(
            RowDef::at(0).with_cell(
                "n",
                CellDef::value("all")
                    .with_col_span(u32::MAX)
                    .with_row_span(2),
            ),
        );
        let mut resolver =
            RowContextResolver::new(&table, IterSource::new(Vec::<u32>::new())).unwrap();

        let row = resolver.resolve(RowIndex::zero()).unwrap().unwrap().row;
        assert_eq!(row.cells[0].value.col_span, 2);
        assert_eq!(resolver.spans.active(), 2);
    }
}
