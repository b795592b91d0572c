//! FILENAME: model/src/predicates.rs
//! PURPOSE: Library of commonly used row predicates.

use crate::expression::RowPredicate;
use crate::selector::{RowIndexDef, Step};

/// Matches every row.
pub fn all<T: 'static>() -> RowPredicate<T> {
    RowPredicate::new(|_| true)
}

pub fn even<T: 'static>() -> RowPredicate<T> {
    RowPredicate::new(|row| row.index() % 2 == 0)
}

pub fn odd<T: 'static>() -> RowPredicate<T> {
    RowPredicate::new(|row| row.index() % 2 == 1)
}

pub fn eq<T: 'static>(index: usize) -> RowPredicate<T> {
    RowPredicate::new(move |row| row.index() == index)
}

pub fn lt<T: 'static>(index: usize) -> RowPredicate<T> {
    RowPredicate::new(move |row| row.index() < index)
}

pub fn lte<T: 'static>(index: usize) -> RowPredicate<T> {
    RowPredicate::new(move |row| row.index() <= index)
}

pub fn gt<T: 'static>(index: usize) -> RowPredicate<T> {
    RowPredicate::new(move |row| row.index() > index)
}

pub fn gte<T: 'static>(index: usize) -> RowPredicate<T> {
    RowPredicate::new(move |row| row.index() >= index)
}

/// First row of the table.
pub fn header<T: 'static>() -> RowPredicate<T> {
    eq(0)
}

/// First row after the record collection is exhausted.
pub fn footer<T: 'static>() -> RowPredicate<T> {
    step_eq(0, Step::TrailingRows)
}

/// Row filled by the record at `record_index` of the collection.
pub fn record<T: 'static>(record_index: usize) -> RowPredicate<T> {
    RowPredicate::new(move |row| row.record_index == Some(record_index))
}

/// Any row filled by a record.
pub fn records<T: 'static>() -> RowPredicate<T> {
    RowPredicate::new(|row| row.has_record())
}

/// Row at relative `index` inside `step`.
pub fn step_eq<T: 'static>(index: usize, step: Step) -> RowPredicate<T> {
    let target = RowIndexDef::in_step(index, step);
    RowPredicate::new(move |row| row.row_index.def() == target)
}
