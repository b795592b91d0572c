//! FILENAME: model/src/value.rs
//! PURPOSE: Defines the value carried by a table cell and its declared type.
//! CONTEXT: Records of any type `T` are projected into `Value`s by column
//! accessors, cell expressions and literals. Absence of a value is modelled
//! with `Option<Value>` so the resolver can fall through to the next source.

use serde::{Deserialize, Serialize};

/// A single cell value after extraction from a record or a cell definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    Number(f64),
    Boolean(bool),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Returns the display value as a String.
    /// Integral numbers are shown without a fractional part.
    pub fn display(&self) -> String {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            Value::Text(s) => s.clone(),
            Value::Boolean(b) => {
                if *b { "TRUE" } else { "FALSE" }.to_string()
            }
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

/// Declared type of a cell, used by render targets to pick a writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    Text,
    Numeric,
    Boolean,
    Date,
    Formula,
}

/// The resolved value of a cell, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellValue {
    pub value: Value,
    /// Cell-declared type, else column-declared type, else untyped.
    pub cell_type: Option<CellType>,
    pub col_span: u32,
    pub row_span: u32,
}

impl CellValue {
    pub fn new(value: Value) -> Self {
        CellValue {
            value,
            cell_type: None,
            col_span: 1,
            row_span: 1,
        }
    }

    pub fn with_type(mut self, cell_type: Option<CellType>) -> Self {
        self.cell_type = cell_type;
        self
    }

    pub fn with_spans(mut self, col_span: u32, row_span: u32) -> Self {
        self.col_span = col_span;
        self.row_span = row_span;
        self
    }

    pub fn is_spanning(&self) -> bool {
        self.col_span > 1 || self.row_span > 1
    }
}
