//! FILENAME: export-engine/tests/test_steps.rs
//! PURPOSE: Tests for rows anchored relative to the trailing step (footers).

mod common;

use common::*;
use model::{
    predicates, CellDef, FontWeight, RowDef, RowIndexDef, Step, Table, TextStyle,
};

fn footer_table() -> Table<Person> {
    person_table()
        .with_row(RowDef::at(0).with_cell("id", CellDef::value("ID")))
        .with_row(RowDef::anchored(RowIndexDef::trailing(0)).with_cell("id", CellDef::value("TOTAL")))
}

#[test]
fn test_footer_follows_last_record() {
    let table = footer_table();
    let rows = resolve_all(&table, &many_people(3)).unwrap();

    assert_eq!(row_numbers(&rows), vec![0, 1, 2, 3, 4]);
    let footer = &rows[4];
    assert!(footer.row.is_custom());
    assert_eq!(value_of(footer, "id"), text("TOTAL"));
    assert_eq!(footer.row.index.def(), RowIndexDef::trailing(0));
}

#[test]
fn test_footer_without_records() {
    let table = footer_table();
    let rows = resolve_all(&table, &[]).unwrap();

    assert_eq!(row_numbers(&rows), vec![0, 1]);
    assert_eq!(value_of(&rows[1], "id"), text("TOTAL"));
}

#[test]
fn test_trailing_rows_keep_relative_order() {
    let table = footer_table()
        .with_row(RowDef::anchored(RowIndexDef::trailing(2)).with_cell("name", CellDef::value("notes")));
    let rows = resolve_all(&table, &sample_people()).unwrap();

    // trailing(1) is undefined and produces no row; trailing(2) keeps its offset
    assert_eq!(row_numbers(&rows), vec![0, 1, 2, 3, 5]);
    assert_eq!(value_of(&rows[4], "name"), text("notes"));
}

#[test]
fn test_trailing_rows_follow_parked_rows() {
    let table = footer_table().with_row(RowDef::at(6).with_cell("name", CellDef::value("parked")));
    let rows = resolve_all(&table, &sample_people()).unwrap();

    assert_eq!(row_numbers(&rows), vec![0, 1, 2, 6, 7]);
    assert_eq!(value_of(&rows[3], "name"), text("parked"));
    assert_eq!(value_of(&rows[4], "id"), text("TOTAL"));
}

#[test]
fn test_footer_predicate_styles_footer_only() {
    let table = footer_table().with_row(
        RowDef::matching(predicates::footer()).with_cell_attribute(TextStyle::new().with_bold(true)),
    );
    let rows = resolve_all(&table, &sample_people()).unwrap();

    let bold = |index: usize| {
        rows[index]
            .row
            .cell("id")
            .and_then(|c| c.attributes.text.as_ref())
            .and_then(|t| t.weight)
            == Some(FontWeight::Bold)
    };
    assert!(!bold(0));
    assert!(!bold(1));
    assert!(!bold(2));
    assert!(bold(3));
}

#[test]
fn test_trailing_expression_sees_step_start() {
    let table = person_table().with_row(
        RowDef::anchored(RowIndexDef::in_step(0, Step::TrailingRows)).with_cell(
            "name",
            CellDef::expression(|row| {
                row.row_index
                    .step
                    .map(|step| format!("{} records", step.start))
            }),
        ),
    );
    let rows = resolve_all(&table, &many_people(4)).unwrap();

    assert_eq!(rows.len(), 5);
    assert_eq!(value_of(&rows[4], "name"), text("4 records"));
}
