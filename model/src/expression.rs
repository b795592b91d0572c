//! FILENAME: model/src/expression.rs
//! PURPOSE: Deferred computations evaluated against the row being resolved.
//! CONTEXT: Cell expressions and row predicates are user closures. They see a
//! `SourceRow`: the runtime row index plus the record that fills the row, if
//! any. Both may fail; failures surface as `EvalError` and abort resolution.

use std::fmt;
use std::sync::Arc;

use crate::error::EvalError;
use crate::selector::RowIndex;
use crate::value::Value;

/// Context of the row currently being resolved.
pub struct SourceRow<'a, T> {
    pub row_index: RowIndex,
    /// Zero-based position of the record within the source collection.
    pub record_index: Option<usize>,
    pub record: Option<&'a T>,
}

impl<'a, T> SourceRow<'a, T> {
    /// A row with no backing record.
    pub fn custom(row_index: RowIndex) -> Self {
        SourceRow {
            row_index,
            record_index: None,
            record: None,
        }
    }

    pub fn with_record(row_index: RowIndex, record_index: usize, record: &'a T) -> Self {
        SourceRow {
            row_index,
            record_index: Some(record_index),
            record: Some(record),
        }
    }

    /// Absolute row number.
    pub fn index(&self) -> usize {
        self.row_index.value
    }

    pub fn has_record(&self) -> bool {
        self.record.is_some()
    }
}

impl<'a, T> Clone for SourceRow<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for SourceRow<'a, T> {}

impl<'a, T> fmt::Debug for SourceRow<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceRow")
            .field("row_index", &self.row_index)
            .field("record_index", &self.record_index)
            .finish()
    }
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

type ExpressionFn<T> =
    Arc<dyn Fn(&SourceRow<'_, T>) -> Result<Option<Value>, EvalError> + Send + Sync>;

fn expression_fn<T, F>(func: F) -> ExpressionFn<T>
where
    F: Fn(&SourceRow<'_, T>) -> Result<Option<Value>, EvalError> + Send + Sync + 'static,
{
    Arc::new(func)
}

/// Cell value computed from the source row.
pub struct Expression<T> {
    func: ExpressionFn<T>,
}

impl<T: 'static> Expression<T> {
    /// Wraps an infallible closure. Returning `None` lets the next value source apply.
    pub fn new<V, F>(func: F) -> Self
    where
        V: Into<Value>,
        F: Fn(&SourceRow<'_, T>) -> Option<V> + Send + Sync + 'static,
    {
        Expression {
            func: expression_fn(move |row| Ok(func(row).map(Into::into))),
        }
    }

    pub fn fallible<F>(func: F) -> Self
    where
        F: Fn(&SourceRow<'_, T>) -> Result<Option<Value>, EvalError> + Send + Sync + 'static,
    {
        Expression {
            func: expression_fn(func),
        }
    }
}

impl<T> Expression<T> {
    pub fn evaluate(&self, row: &SourceRow<'_, T>) -> Result<Option<Value>, EvalError> {
        (self.func)(row)
    }
}

impl<T> Clone for Expression<T> {
    fn clone(&self) -> Self {
        Expression {
            func: Arc::clone(&self.func),
        }
    }
}

impl<T> fmt::Debug for Expression<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Expression")
    }
}

// ============================================================================
// PREDICATES
// ============================================================================

type PredicateFn<T> = Arc<dyn Fn(&SourceRow<'_, T>) -> Result<bool, EvalError> + Send + Sync>;

fn predicate_fn<T, F>(func: F) -> PredicateFn<T>
where
    F: Fn(&SourceRow<'_, T>) -> Result<bool, EvalError> + Send + Sync + 'static,
{
    Arc::new(func)
}

/// Decides whether a row definition applies to the source row.
pub struct RowPredicate<T> {
    func: PredicateFn<T>,
}

impl<T: 'static> RowPredicate<T> {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&SourceRow<'_, T>) -> bool + Send + Sync + 'static,
    {
        RowPredicate {
            func: predicate_fn(move |row| Ok(func(row))),
        }
    }

    pub fn fallible<F>(func: F) -> Self
    where
        F: Fn(&SourceRow<'_, T>) -> Result<bool, EvalError> + Send + Sync + 'static,
    {
        RowPredicate {
            func: predicate_fn(func),
        }
    }

    /// Both predicates must match. `other` is not evaluated when `self` fails.
    pub fn and(self, other: RowPredicate<T>) -> Self {
        RowPredicate {
            func: predicate_fn(move |row| Ok(self.test(row)? && other.test(row)?)),
        }
    }

    pub fn or(self, other: RowPredicate<T>) -> Self {
        RowPredicate {
            func: predicate_fn(move |row| Ok(self.test(row)? || other.test(row)?)),
        }
    }

    pub fn negate(self) -> Self {
        RowPredicate {
            func: predicate_fn(move |row| Ok(!self.test(row)?)),
        }
    }
}

impl<T> RowPredicate<T> {
    pub fn test(&self, row: &SourceRow<'_, T>) -> Result<bool, EvalError> {
        (self.func)(row)
    }
}

impl<T> Clone for RowPredicate<T> {
    fn clone(&self) -> Self {
        RowPredicate {
            func: Arc::clone(&self.func),
        }
    }
}

impl<T> fmt::Debug for RowPredicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RowPredicate")
    }
}
