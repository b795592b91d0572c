//! FILENAME: export-engine/benches/resolve_rows.rs
//! Row resolution benchmarks: plain collections, striped predicates and spans.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use export_engine::{BufferedSource, IterSource, RenderOperations, RowContextResolver, TableExport};
use export_engine::{CellContext, ExportError};
use model::{
    predicates, Background, CellDef, Color, Column, ExportSettings, RowDef, RowIndexDef,
    RowSpanStrategy, Table, TextStyle,
};

#[derive(Clone)]
struct Sale {
    id: u64,
    region: String,
    amount: f64,
}

fn create_sales(count: usize) -> Vec<Sale> {
    (0..count)
        .map(|i| Sale {
            id: i as u64,
            region: format!("R{}", i % 7),
            amount: (i as f64) * 1.5,
        })
        .collect()
}

fn create_table() -> Table<Sale> {
    Table::new()
        .with_name("sales")
        .with_column(Column::property("id", |s: &Sale| s.id as f64))
        .with_column(Column::property("region", |s: &Sale| s.region.clone()))
        .with_column(Column::property("amount", |s: &Sale| s.amount))
        .with_row(
            RowDef::at(0)
                .with_cell("id", CellDef::value("Id"))
                .with_cell("region", CellDef::value("Region"))
                .with_cell("amount", CellDef::value("Amount"))
                .with_cell_attribute(TextStyle::new().with_bold(true)),
        )
        .with_row(RowDef::matching(predicates::even()).with_cell_attribute(Background::color(Color::LIGHT_GRAY)))
        .with_row(RowDef::matching(predicates::odd()).with_cell_attribute(Background::color(Color::WHITE)))
        .with_row(RowDef::anchored(RowIndexDef::trailing(0)).with_cell("id", CellDef::value("Total")))
}

struct CountingSink(usize);

impl RenderOperations<Sale> for CountingSink {
    fn render_cell(&mut self, _cell: &CellContext<'_, Sale>) -> Result<(), ExportError> {
        self.0 += 1;
        Ok(())
    }
}

fn bench_resolve(c: &mut Criterion) {
    let table = create_table();
    let mut group = c.benchmark_group("resolve");

    for size in [100usize, 1_000, 10_000] {
        let sales = create_sales(size);

        group.bench_with_input(BenchmarkId::new("streaming", size), &sales, |b, sales| {
            b.iter(|| {
                let resolver =
                    RowContextResolver::new(&table, IterSource::new(sales.iter())).unwrap();
                black_box(resolver.into_iter().count())
            })
        });

        group.bench_with_input(BenchmarkId::new("buffered", size), &sales, |b, sales| {
            b.iter(|| {
                let source: BufferedSource<Sale> = sales.iter().cloned().collect();
                let resolver = RowContextResolver::new(&table, source).unwrap();
                black_box(resolver.into_iter().count())
            })
        });

        group.bench_with_input(BenchmarkId::new("uncached", size), &sales, |b, sales| {
            let settings = ExportSettings::default().with_cache_synthetic_rows(false);
            b.iter(|| {
                let resolver = RowContextResolver::with_settings(
                    &table,
                    IterSource::new(sales.iter()),
                    settings.clone(),
                )
                .unwrap();
                black_box(resolver.into_iter().count())
            })
        });
    }

    group.finish();
}

fn bench_spans(c: &mut Criterion) {
    let sales = create_sales(1_000);
    let mut group = c.benchmark_group("spans");

    for strategy in [RowSpanStrategy::Shadow, RowSpanStrategy::Skip, RowSpanStrategy::Pushback] {
        let table = (0..50).fold(create_table(), |table, i| {
            table.with_row(
                RowDef::at(i * 20 + 1).with_cell(
                    "region",
                    CellDef::value("group")
                        .with_row_span(3)
                        .with_row_span_strategy(strategy),
                ),
            )
        });

        group.bench_function(format!("{:?}", strategy), |b| {
            b.iter(|| {
                let mut sink = CountingSink(0);
                TableExport::new()
                    .export(&table, IterSource::new(sales.iter()), &mut sink)
                    .unwrap();
                black_box(sink.0)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_spans);
criterion_main!(benches);
