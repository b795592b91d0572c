//! FILENAME: export-engine/tests/common/mod.rs
//! Test harness and fixtures for export engine integration tests.

#![allow(dead_code)]

use export_engine::{ExportError, IterSource, ResolvedRow, RowContextResolver};
use model::{Column, ExportSettings, Table, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: i64,
    pub name: String,
}

impl Person {
    pub fn new(id: i64, name: &str) -> Self {
        Person {
            id,
            name: name.to_string(),
        }
    }
}

/// Two records: {1, "A"} and {2, "B"}.
pub fn sample_people() -> Vec<Person> {
    vec![Person::new(1, "A"), Person::new(2, "B")]
}

/// `count` records named "P0", "P1", ...
pub fn many_people(count: usize) -> Vec<Person> {
    (0..count)
        .map(|i| Person::new(i as i64 + 1, &format!("P{}", i)))
        .collect()
}

/// Table with property columns "id" and "name".
pub fn person_table() -> Table<Person> {
    Table::new()
        .with_column(Column::property("id", |p: &Person| p.id))
        .with_column(Column::property("name", |p: &Person| p.name.clone()))
}

/// Resolves every row of `table` filled from `people`.
pub fn resolve_all(
    table: &Table<Person>,
    people: &[Person],
) -> Result<Vec<ResolvedRow<Person>>, ExportError> {
    resolve_all_with(table, people, ExportSettings::default())
}

pub fn resolve_all_with(
    table: &Table<Person>,
    people: &[Person],
    settings: ExportSettings,
) -> Result<Vec<ResolvedRow<Person>>, ExportError> {
    RowContextResolver::with_settings(table, IterSource::new(people.iter()), settings)?
        .into_iter()
        .collect()
}

/// Absolute row numbers of resolved rows.
pub fn row_numbers(rows: &[ResolvedRow<Person>]) -> Vec<usize> {
    rows.iter().map(|r| r.row.index.value).collect()
}

/// Value of column `name` in a resolved row.
pub fn value_of(row: &ResolvedRow<Person>, name: &str) -> Option<Value> {
    row.row.cell(name).map(|c| c.value.value.clone())
}

pub fn text(s: &str) -> Option<Value> {
    Some(Value::text(s))
}

pub fn number(n: f64) -> Option<Value> {
    Some(Value::Number(n))
}
