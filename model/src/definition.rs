//! FILENAME: model/src/definition.rs
//! PURPOSE: Table, column, row and cell definitions.
//! CONTEXT: A `Table<T>` is built once, validated, and then read by the
//! export engine without further mutation. Row definitions are templates,
//! not materialized rows: each one applies to every resolved row its
//! qualifier selects, and several may apply to the same row at once.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::attributes::{
    CellAttribute, CellAttributes, ColumnAttribute, ColumnAttributes, RowAttribute, RowAttributes,
    TableAttribute, TableAttributes,
};
use crate::error::ModelError;
use crate::expression::{Expression, RowPredicate, SourceRow};
use crate::key::ColumnKey;
use crate::selector::{RowAnchor, RowQualifier};
use crate::settings::ExportSettings;
use crate::value::{CellType, Value};

// ============================================================================
// ROW SPAN STRATEGY
// ============================================================================

/// What happens to rows covered by a cell spanning several rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowSpanStrategy {
    /// Covered rows render, minus the cells under the span.
    #[default]
    Shadow,
    /// Covered rows are not visited at all.
    Skip,
    /// Anchored rows after the spanning row move down by the span.
    Pushback,
    /// Any row rendered under the span is an error.
    Throw,
}

impl RowSpanStrategy {
    /// Higher priority governs when cells of one row disagree.
    pub fn priority(&self) -> u8 {
        match self {
            RowSpanStrategy::Shadow => 1,
            RowSpanStrategy::Skip => 2,
            RowSpanStrategy::Pushback => 3,
            RowSpanStrategy::Throw => 4,
        }
    }
}

// ============================================================================
// CELL
// ============================================================================

/// Definition of one cell within a row definition.
pub struct CellDef<T> {
    pub value: Option<Value>,
    pub expression: Option<Expression<T>>,
    pub col_span: Option<u32>,
    pub row_span: Option<u32>,
    pub row_span_strategy: Option<RowSpanStrategy>,
    pub cell_type: Option<CellType>,
    pub attributes: CellAttributes,
}

impl<T> CellDef<T> {
    pub fn new() -> Self {
        CellDef {
            value: None,
            expression: None,
            col_span: None,
            row_span: None,
            row_span_strategy: None,
            cell_type: None,
            attributes: CellAttributes::default(),
        }
    }

    /// Cell with a literal value.
    pub fn value(value: impl Into<Value>) -> Self {
        CellDef::new().with_value(value)
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_expression(mut self, expression: Expression<T>) -> Self {
        self.expression = Some(expression);
        self
    }

    pub fn with_col_span(mut self, span: u32) -> Self {
        self.col_span = Some(span);
        self
    }

    pub fn with_row_span(mut self, span: u32) -> Self {
        self.row_span = Some(span);
        self
    }

    pub fn with_row_span_strategy(mut self, strategy: RowSpanStrategy) -> Self {
        self.row_span_strategy = Some(strategy);
        self
    }

    pub fn with_type(mut self, cell_type: CellType) -> Self {
        self.cell_type = Some(cell_type);
        self
    }

    pub fn with(mut self, attribute: impl Into<CellAttribute>) -> Self {
        self.attributes = self.attributes.with(attribute);
        self
    }

    /// Right-biased merge: every field `other` sets wins, unset fields keep `self`'s.
    pub fn merged(&self, other: &CellDef<T>) -> CellDef<T> {
        CellDef {
            value: other.value.clone().or_else(|| self.value.clone()),
            expression: other
                .expression
                .clone()
                .or_else(|| self.expression.clone()),
            col_span: other.col_span.or(self.col_span),
            row_span: other.row_span.or(self.row_span),
            row_span_strategy: other.row_span_strategy.or(self.row_span_strategy),
            cell_type: other.cell_type.or(self.cell_type),
            attributes: self.attributes.merge(&other.attributes),
        }
    }
}

impl<T: 'static> CellDef<T> {
    /// Cell computed from the source row.
    pub fn expression<V, F>(func: F) -> Self
    where
        V: Into<Value>,
        F: Fn(&SourceRow<'_, T>) -> Option<V> + Send + Sync + 'static,
    {
        CellDef::new().with_expression(Expression::new(func))
    }
}

impl<T> Default for CellDef<T> {
    fn default() -> Self {
        CellDef::new()
    }
}

impl<T> Clone for CellDef<T> {
    fn clone(&self) -> Self {
        CellDef {
            value: self.value.clone(),
            expression: self.expression.clone(),
            col_span: self.col_span,
            row_span: self.row_span,
            row_span_strategy: self.row_span_strategy,
            cell_type: self.cell_type,
            attributes: self.attributes.clone(),
        }
    }
}

impl<T> fmt::Debug for CellDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellDef")
            .field("value", &self.value)
            .field("expression", &self.expression.is_some())
            .field("col_span", &self.col_span)
            .field("row_span", &self.row_span)
            .field("row_span_strategy", &self.row_span_strategy)
            .field("cell_type", &self.cell_type)
            .field("attributes", &self.attributes)
            .finish()
    }
}

// ============================================================================
// ROW
// ============================================================================

/// Row template applied to every row its qualifier selects.
pub struct RowDef<T> {
    pub qualifier: RowQualifier<T>,
    pub attributes: RowAttributes,
    /// Default attributes for every cell of the row.
    pub cell_attributes: CellAttributes,
    cells: Vec<(ColumnKey<T>, CellDef<T>)>,
}

impl<T> RowDef<T> {
    pub fn new(qualifier: RowQualifier<T>) -> Self {
        RowDef {
            qualifier,
            attributes: RowAttributes::default(),
            cell_attributes: CellAttributes::default(),
            cells: Vec::new(),
        }
    }

    /// Row inserted at a fixed index.
    pub fn at(index: usize) -> Self {
        RowDef::new(RowQualifier::anchored(RowAnchor::at(index)))
    }

    pub fn anchored(anchor: impl Into<RowAnchor>) -> Self {
        RowDef::new(RowQualifier::anchored(anchor))
    }

    /// Row applied wherever the predicate matches.
    pub fn matching(predicate: RowPredicate<T>) -> Self {
        RowDef::new(RowQualifier::matching(predicate))
    }

    /// Adds a predicate; on an anchored row the definition also applies
    /// wherever the predicate matches.
    pub fn with_predicate(mut self, predicate: RowPredicate<T>) -> Self {
        self.qualifier.predicate = Some(predicate);
        self
    }

    pub fn with(mut self, attribute: impl Into<RowAttribute>) -> Self {
        self.attributes = self.attributes.with(attribute);
        self
    }

    pub fn with_cell_attribute(mut self, attribute: impl Into<CellAttribute>) -> Self {
        self.cell_attributes = self.cell_attributes.with(attribute);
        self
    }

    /// Sets the cell for a column, replacing a previous definition for the same key.
    pub fn with_cell(mut self, key: impl Into<ColumnKey<T>>, cell: CellDef<T>) -> Self {
        let key = key.into();
        match self.cells.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = cell,
            None => self.cells.push((key, cell)),
        }
        self
    }

    pub fn cell(&self, key: &ColumnKey<T>) -> Option<&CellDef<T>> {
        self.cells.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    /// Cells in declaration order.
    pub fn cells(&self) -> impl Iterator<Item = (&ColumnKey<T>, &CellDef<T>)> {
        self.cells.iter().map(|(k, c)| (k, c))
    }

    pub fn is_anchored(&self) -> bool {
        self.qualifier.anchor.is_some()
    }
}

impl<T> Clone for RowDef<T> {
    fn clone(&self) -> Self {
        RowDef {
            qualifier: self.qualifier.clone(),
            attributes: self.attributes.clone(),
            cell_attributes: self.cell_attributes.clone(),
            cells: self.cells.clone(),
        }
    }
}

impl<T> fmt::Debug for RowDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowDef")
            .field("qualifier", &self.qualifier)
            .field("attributes", &self.attributes)
            .field("cells", &self.cells.len())
            .finish()
    }
}

// ============================================================================
// COLUMN
// ============================================================================

pub type Formatter = Arc<dyn Fn(Value) -> Value + Send + Sync>;

pub struct Column<T> {
    pub key: ColumnKey<T>,
    /// Explicit display position. Unset columns keep their declaration position.
    pub index: Option<usize>,
    pub cell_type: Option<CellType>,
    formatter: Option<Formatter>,
    pub attributes: ColumnAttributes,
    /// Default attributes for every cell of the column.
    pub cell_attributes: CellAttributes,
}

impl<T> Column<T> {
    pub fn new(key: impl Into<ColumnKey<T>>) -> Self {
        Column {
            key: key.into(),
            index: None,
            cell_type: None,
            formatter: None,
            attributes: ColumnAttributes::default(),
            cell_attributes: CellAttributes::default(),
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_type(mut self, cell_type: CellType) -> Self {
        self.cell_type = Some(cell_type);
        self
    }

    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn with(mut self, attribute: impl Into<ColumnAttribute>) -> Self {
        self.attributes = self.attributes.with(attribute);
        self
    }

    pub fn with_cell_attribute(mut self, attribute: impl Into<CellAttribute>) -> Self {
        self.cell_attributes = self.cell_attributes.with(attribute);
        self
    }

    /// Applies the column formatter, if any.
    pub fn format(&self, value: Value) -> Value {
        match &self.formatter {
            Some(formatter) => formatter(value),
            None => value,
        }
    }

    pub fn name(&self) -> &str {
        self.key.name()
    }
}

impl<T: 'static> Column<T> {
    /// Column backed by a record property.
    pub fn property<V, F>(name: impl Into<String>, accessor: F) -> Self
    where
        V: Into<Value>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        Column::new(ColumnKey::property(name, accessor))
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Column {
            key: self.key.clone(),
            index: self.index,
            cell_type: self.cell_type,
            formatter: self.formatter.clone(),
            attributes: self.attributes.clone(),
            cell_attributes: self.cell_attributes.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("index", &self.index)
            .field("cell_type", &self.cell_type)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

// ============================================================================
// TABLE
// ============================================================================

/// Aggregate root of the model.
pub struct Table<T> {
    pub name: String,
    pub first_row: usize,
    pub first_column: usize,
    columns: Vec<Column<T>>,
    rows: Vec<RowDef<T>>,
    pub attributes: TableAttributes,
    /// Lowest-precedence attributes for every cell.
    pub cell_attributes: CellAttributes,
    pub row_attributes: RowAttributes,
    pub column_attributes: ColumnAttributes,
}

impl<T> Table<T> {
    pub fn new() -> Self {
        Table::from_settings(&ExportSettings::default())
    }

    /// Empty table named and positioned from `settings`.
    pub fn from_settings(settings: &ExportSettings) -> Self {
        Table {
            name: settings.default_table_name.clone(),
            first_row: settings.first_row,
            first_column: settings.first_column,
            columns: Vec::new(),
            rows: Vec::new(),
            attributes: TableAttributes::default(),
            cell_attributes: CellAttributes::default(),
            row_attributes: RowAttributes::default(),
            column_attributes: ColumnAttributes::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_first_row(mut self, first_row: usize) -> Self {
        self.first_row = first_row;
        self
    }

    pub fn with_first_column(mut self, first_column: usize) -> Self {
        self.first_column = first_column;
        self
    }

    pub fn with_column(mut self, column: Column<T>) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_row(mut self, row: RowDef<T>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn with(mut self, attribute: impl Into<TableAttribute>) -> Self {
        self.attributes = self.attributes.with(attribute);
        self
    }

    pub fn with_cell_attribute(mut self, attribute: impl Into<CellAttribute>) -> Self {
        self.cell_attributes = self.cell_attributes.with(attribute);
        self
    }

    pub fn with_row_attribute(mut self, attribute: impl Into<RowAttribute>) -> Self {
        self.row_attributes = self.row_attributes.with(attribute);
        self
    }

    pub fn with_column_attribute(mut self, attribute: impl Into<ColumnAttribute>) -> Self {
        self.column_attributes = self.column_attributes.with(attribute);
        self
    }

    /// Columns in display order: explicit index, else declaration position.
    pub fn columns(&self) -> Vec<&Column<T>> {
        let mut ordered: Vec<(usize, &Column<T>)> = self
            .columns
            .iter()
            .enumerate()
            .map(|(position, column)| (column.index.unwrap_or(position), column))
            .collect();
        ordered.sort_by_key(|(index, _)| *index);
        ordered.into_iter().map(|(_, column)| column).collect()
    }

    pub fn column(&self, key: &ColumnKey<T>) -> Option<&Column<T>> {
        self.columns.iter().find(|c| &c.key == key)
    }

    pub fn rows(&self) -> &[RowDef<T>] {
        &self.rows
    }

    /// Checks the invariants the export engine relies on.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name()) {
                return Err(ModelError::DuplicateColumn(column.name().to_string()));
            }
        }

        for row in &self.rows {
            if let Some(anchor) = &row.qualifier.anchor {
                anchor.materialize()?;
            }
            for (key, cell) in row.cells() {
                if !seen.contains(key.name()) {
                    return Err(ModelError::UnknownColumn(key.name().to_string()));
                }
                if cell.col_span == Some(0) || cell.row_span == Some(0) {
                    return Err(ModelError::InvalidSpan {
                        column: key.name().to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table::new()
    }
}

impl<T> fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("first_row", &self.first_row)
            .field("first_column", &self.first_column)
            .field("columns", &self.columns)
            .field("rows", &self.rows)
            .finish()
    }
}
