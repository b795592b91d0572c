//! FILENAME: model/src/lib.rs
//! PURPOSE: Main library entry point for the table model.
//! CONTEXT: Re-exports public types and modules for use by the export engine
//! and render targets.

pub mod attributes;
pub mod definition;
pub mod error;
pub mod expression;
pub mod key;
pub mod predicates;
pub mod selector;
pub mod settings;
pub mod value;

// Re-export commonly used types at the crate root
pub use attributes::{
    Alignment, Background, Border, BorderLineStyle, Borders, CellAttribute, CellAttributes,
    Color, ColumnAttribute, ColumnAttributes, ColumnWidth, DataFormat, FillPattern, FontWeight,
    HorizontalAlign, Margins, NumberFormat, Override, RowAttribute, RowAttributes, RowHeight,
    TableAttribute, TableAttributes, TextStyle, VerticalAlign,
};
pub use definition::{CellDef, Column, Formatter, RowDef, RowSpanStrategy, Table};
pub use error::{EvalError, ModelError};
pub use expression::{Expression, RowPredicate, SourceRow};
pub use key::{ColumnKey, PropertyRef};
pub use selector::{RowAnchor, RowIndex, RowIndexDef, RowQualifier, Step, StepIndex};
pub use settings::ExportSettings;
pub use value::{CellType, CellValue, Value};
