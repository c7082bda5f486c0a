//! Inference performance benchmarks.
//!
//! Measures loading and type inference across table sizes and column mixes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Write;
use tabclean::inference::coerce::{parse_datetime_str, parse_number_str};
use tabclean::{Parser, Table, TypeInference};
use tempfile::NamedTempFile;

/// Generate synthetic CSV data with the specified number of rows and columns.
fn generate_csv_data(rows: usize, cols: usize) -> String {
    let mut data = String::new();

    // Header row
    for i in 0..cols {
        if i > 0 {
            data.push(',');
        }
        data.push_str(&format!("column_{}", i + 1));
    }
    data.push('\n');

    // Data rows
    for row in 0..rows {
        for col in 0..cols {
            if col > 0 {
                data.push(',');
            }
            // Mix of data types, with the odd bad cell
            match col % 5 {
                0 => data.push_str(&row.to_string()),
                1 => data.push_str(&format!("{:.2}", row as f64 * 1.5)),
                2 => data.push_str(&format!("2023-{:02}-{:02}", (row % 12) + 1, (row % 28) + 1)),
                3 if row % 17 == 0 => data.push_str("n/a"),
                3 => data.push_str(&format!("{}", row % 1000)),
                4 => data.push_str(&format!("Category_{}", row % 10)),
                _ => unreachable!(),
            }
        }
        data.push('\n');
    }

    data
}

fn load(data: &str) -> Table {
    Parser::new().parse_str(data).unwrap()
}

/// Benchmark inference over tables of various sizes.
fn bench_infer_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("infer_rows");
    let engine = TypeInference::new();

    for rows in [100, 1_000, 10_000].iter() {
        let table = load(&generate_csv_data(*rows, 10));

        group.throughput(Throughput::Elements((*rows * 10) as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(engine.infer(table).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark inference with varying column counts.
fn bench_infer_column_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("infer_column_scaling");
    let engine = TypeInference::new();

    let rows = 1_000;
    for cols in [5, 10, 20, 50].iter() {
        let table = load(&generate_csv_data(rows, *cols));

        group.throughput(Throughput::Elements((rows * cols) as u64));
        group.bench_with_input(BenchmarkId::new("cols", cols), &table, |b, table| {
            b.iter(|| black_box(engine.infer(table).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark the cell parsers on typical and worst-case text.
fn bench_coerce(c: &mut Criterion) {
    let mut group = c.benchmark_group("coerce");

    let samples = [
        ("integer", "123456"),
        ("float", "1,234.5678"),
        ("iso_date", "2023-06-15"),
        ("us_date", "06/15/2023"),
        ("text", "not a number or a date"),
    ];

    for (name, text) in samples {
        group.bench_with_input(BenchmarkId::new("number", name), text, |b, text| {
            b.iter(|| black_box(parse_number_str(text)))
        });
        group.bench_with_input(BenchmarkId::new("datetime", name), text, |b, text| {
            b.iter(|| black_box(parse_datetime_str(text)))
        });
    }

    group.finish();
}

/// Benchmark loading a file from disk and cleaning it end to end.
fn bench_load_and_infer(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_and_infer");

    for rows in [1_000, 10_000].iter() {
        let data = generate_csv_data(*rows, 10);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter_with_setup(
                || {
                    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
                    temp.write_all(data.as_bytes()).unwrap();
                    temp
                },
                |temp| {
                    let cleaner = tabclean::Cleaner::new();
                    black_box(cleaner.clean_file(temp.path()).unwrap())
                },
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_infer_rows,
    bench_infer_column_scaling,
    bench_coerce,
    bench_load_and_infer,
);
criterion_main!(benches);
