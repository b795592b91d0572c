//! FILENAME: grid-render/tests/common/mod.rs
//! Fixtures for grid render integration tests.

#![allow(dead_code)]

use export_engine::IterSource;
use grid_render::{GridError, GridRenderer, RenderedSheet};
use model::{Column, ExportSettings, Table};

#[derive(Debug, Clone)]
pub struct Invoice {
    pub number: u32,
    pub customer: String,
    pub total: f64,
}

pub fn sample_invoices() -> Vec<Invoice> {
    vec![
        Invoice {
            number: 1001,
            customer: "Acme".to_string(),
            total: 1250.5,
        },
        Invoice {
            number: 1002,
            customer: "Globex".to_string(),
            total: 80.0,
        },
        Invoice {
            number: 1003,
            customer: "Initech".to_string(),
            total: 4999.99,
        },
    ]
}

/// Columns "number", "customer" and "total".
pub fn invoice_table() -> Table<Invoice> {
    Table::new()
        .with_name("invoices")
        .with_column(Column::property("number", |i: &Invoice| i.number))
        .with_column(Column::property("customer", |i: &Invoice| i.customer.clone()))
        .with_column(Column::property("total", |i: &Invoice| i.total))
}

pub fn render(table: &Table<Invoice>, invoices: &[Invoice]) -> Result<RenderedSheet, GridError> {
    GridRenderer::render(table, IterSource::new(invoices.iter()), ExportSettings::default())
        .map(|(sheet, _)| sheet)
}
