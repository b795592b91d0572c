//! FILENAME: export-engine/src/merge.rs
//! PURPOSE: Merges the row definitions that apply to a row into one synthetic row.
//! CONTEXT: Several row definitions may match the same row. Their cells are
//! merged per column (later definitions win field by field) and their
//! attributes are layered on top of table and column defaults. The result
//! only depends on the set of matched definitions, so it is cached by that
//! set and reused for every row the same set matches.

use std::rc::Rc;

use model::{
    CellAttributes, CellDef, Column, EvalError, Expression, PropertyRef, RowAttributes,
    SourceRow, Table, Value,
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::rows::MatchedRows;

// ============================================================================
// SYNTHETIC ROW
// ============================================================================

/// Merged view of one set of matched row definitions.
pub struct SyntheticRow<T> {
    pub attributes: RowAttributes,
    /// Merged cell definition per column, in display order.
    cells: Vec<Option<CellDef<T>>>,
    /// Effective cell attributes per column, in display order.
    cell_attributes: Vec<CellAttributes>,
}

impl<T> SyntheticRow<T> {
    /// Merges `matched` (positions into the table's row list) in order.
    pub fn build(table: &Table<T>, columns: &[&Column<T>], matched: &[usize]) -> Self {
        let definitions = table.rows();
        let mut attributes = table.row_attributes.clone();
        let mut row_cell_defaults = CellAttributes::default();
        let mut cells: Vec<Option<CellDef<T>>> = (0..columns.len()).map(|_| None).collect();

        for &position in matched {
            let row = &definitions[position];
            attributes = attributes.merge(&row.attributes);
            row_cell_defaults = row_cell_defaults.merge(&row.cell_attributes);

            for (key, cell) in row.cells() {
                let Some(slot) = columns.iter().position(|c| &c.key == key) else {
                    continue;
                };
                cells[slot] = Some(match cells[slot].take() {
                    Some(previous) => previous.merged(cell),
                    None => cell.clone(),
                });
            }
        }

        let cell_attributes = columns
            .iter()
            .zip(&cells)
            .map(|(column, cell)| {
                let layered = table
                    .cell_attributes
                    .merge(&column.cell_attributes)
                    .merge(&row_cell_defaults);
                match cell {
                    Some(cell) => layered.merge(&cell.attributes),
                    None => layered,
                }
            })
            .collect();

        SyntheticRow {
            attributes,
            cells,
            cell_attributes,
        }
    }

    pub fn cell(&self, column: usize) -> Option<&CellDef<T>> {
        self.cells.get(column).and_then(|c| c.as_ref())
    }

    pub fn cell_attributes(&self, column: usize) -> &CellAttributes {
        &self.cell_attributes[column]
    }
}

// ============================================================================
// VALUE SOURCES
// ============================================================================

/// Where a cell value can come from, in precedence order.
pub enum ValueSource<'a, T> {
    Expression(&'a Expression<T>),
    Literal(&'a Value),
    Property(&'a PropertyRef<T>),
}

/// Value sources of a column's cell, highest precedence first.
pub fn value_sources<'a, T>(
    cell: Option<&'a CellDef<T>>,
    column: &'a Column<T>,
) -> SmallVec<[ValueSource<'a, T>; 3]> {
    let mut sources = SmallVec::new();
    if let Some(cell) = cell {
        if let Some(expression) = &cell.expression {
            sources.push(ValueSource::Expression(expression));
        }
        if let Some(value) = &cell.value {
            sources.push(ValueSource::Literal(value));
        }
    }
    if let Some(property) = column.key.property_ref() {
        sources.push(ValueSource::Property(property));
    }
    sources
}

/// First value produced by `sources`, passed through the column formatter.
pub fn resolve_value<T>(
    sources: &[ValueSource<'_, T>],
    column: &Column<T>,
    row: &SourceRow<'_, T>,
) -> Result<Option<Value>, EvalError> {
    for source in sources {
        let value = match source {
            ValueSource::Expression(expression) => expression.evaluate(row)?,
            ValueSource::Literal(value) => Some((*value).clone()),
            ValueSource::Property(property) => row.record.and_then(|r| property.get(r)),
        };
        if let Some(value) = value {
            return Ok(Some(column.format(value)));
        }
    }
    Ok(None)
}

// ============================================================================
// CACHE
// ============================================================================

/// Synthetic rows keyed by the set of definitions they were built from.
pub struct QualifiedRows<T> {
    cache: FxHashMap<MatchedRows, Rc<SyntheticRow<T>>>,
    enabled: bool,
}

impl<T> QualifiedRows<T> {
    pub fn new(enabled: bool) -> Self {
        QualifiedRows {
            cache: FxHashMap::default(),
            enabled,
        }
    }

    pub fn get(
        &mut self,
        table: &Table<T>,
        columns: &[&Column<T>],
        matched: &MatchedRows,
    ) -> Rc<SyntheticRow<T>> {
        if !self.enabled {
            return Rc::new(SyntheticRow::build(table, columns, matched));
        }
        if let Some(row) = self.cache.get(matched) {
            return Rc::clone(row);
        }
        let row = Rc::new(SyntheticRow::build(table, columns, matched));
        self.cache.insert(matched.clone(), Rc::clone(&row));
        row
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
