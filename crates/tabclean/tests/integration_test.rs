//! Integration tests for tabclean.

use std::io::Write;
use tempfile::NamedTempFile;

use tabclean::reshape::reshape;
use tabclean::{
    infer, Cell, Cleaner, CleanerConfig, Column, ColumnType, ExportFormat, Exporter,
    InferenceConfig, Parser, ParserConfig, ReshapeOptions, Table, TabcleanError,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn raw_table(columns: &[(&str, &[&str])]) -> Table {
    Table::new(
        columns
            .iter()
            .map(|(name, values)| Column::from_raw(*name, values))
            .collect(),
    )
    .expect("Failed to build table")
}

// =============================================================================
// Loading Tests
// =============================================================================

#[test]
fn test_load_basic_csv() {
    let content = "id,name,age\n\
                   1,Alice,30\n\
                   2,Bob,25\n\
                   3,Carol,28\n";
    let file = create_test_file(content);

    let (table, source) = Cleaner::new().load(file.path()).expect("Load failed");

    assert_eq!(source.row_count, 3);
    assert_eq!(source.column_count, 3);
    assert_eq!(source.format, "csv");
    assert!(source.hash.starts_with("sha256:"));
    assert_eq!(table.column_names(), vec!["id", "name", "age"]);
    assert_eq!(table.get(0, 1), Some(&Cell::Text("Alice".into())));
}

#[test]
fn test_load_tsv_auto_detect() {
    let content = "sample\tvisit\tweight\n\
                   S001\t2022-03-01\t71.5\n\
                   S002\t2022-03-08\t80\n";
    let file = create_test_file(content);

    let (table, source) = Cleaner::new().load(file.path()).expect("Load failed");

    assert_eq!(source.format, "tsv");
    assert_eq!(table.column_count(), 3);
}

#[test]
fn test_load_na_tokens_become_missing() {
    let content = "a,b\nNA,1\nn/a,2\n#N/A,3\nnull,4\n";
    let file = create_test_file(content);

    let (table, _) = Cleaner::new().load(file.path()).expect("Load failed");

    let a = table.column("a").unwrap();
    assert_eq!(a.missing_count(), 4);
}

#[test]
fn test_load_blank_and_duplicate_headers() {
    let table = Parser::new()
        .parse_str("x,,x,x\n1,2,3,4\n")
        .expect("Parse failed");

    assert_eq!(table.column_names(), vec!["x", "column_2", "x.1", "x.2"]);
}

#[test]
fn test_load_ragged_rows() {
    let table = Parser::new()
        .parse_str("a,b,c\n1,2\n3,4,5,6\n")
        .expect("Parse failed");

    assert_eq!(table.row_count(), 2);
    assert_eq!(table.get(0, 2), Some(&Cell::Missing));
    assert_eq!(table.get(1, 2), Some(&Cell::Text("5".into())));
}

#[test]
fn test_load_empty_file() {
    let file = create_test_file("");
    let err = Cleaner::new().load(file.path()).unwrap_err();
    assert!(matches!(err, TabcleanError::EmptyData(_)));
}

#[test]
fn test_header_only_file_is_zero_rows() {
    let file = create_test_file("a,b,c\n");
    let cleaned = Cleaner::new().clean_file(file.path()).expect("Clean failed");

    assert_eq!(cleaned.table().row_count(), 0);
    assert_eq!(cleaned.result.column_type("a"), Some(ColumnType::Empty));
}

// =============================================================================
// Type Inference Tests
// =============================================================================

#[test]
fn test_mixed_numeric_column() {
    let table = raw_table(&[("a", &["1", "2", "x", "4", "5"])]);

    let result = infer(&table, 0.6, 0.8).expect("Inference failed");

    assert_eq!(result.types["a"], ColumnType::Integer);
    let cells = &result.table.column("a").unwrap().cells;
    assert_eq!(
        cells,
        &vec![
            Cell::Integer(1),
            Cell::Integer(2),
            Cell::Missing,
            Cell::Integer(4),
            Cell::Integer(5)
        ]
    );
}

#[test]
fn test_mostly_dates_column() {
    let table = raw_table(&[(
        "d",
        &["2020-01-01", "2020-02-01", "2020-03-01", "not a date", "2020-05-01"],
    )]);

    let result = infer(&table, 0.6, 0.8).expect("Inference failed");

    assert_eq!(result.types["d"], ColumnType::DateTime);
    let column = result.table.column("d").unwrap();
    assert_eq!(column.missing_count(), 1);
    assert!(matches!(column.cells[3], Cell::Missing));
    assert!(matches!(column.cells[4], Cell::DateTime(_)));
}

#[test]
fn test_float_and_string_columns() {
    let table = raw_table(&[
        ("price", &["1.5", "2", "3.25", ""]),
        ("label", &["  red ", "nan", "None", "blue"]),
    ]);

    let result = infer(&table, 0.6, 0.8).expect("Inference failed");

    assert_eq!(result.types["price"], ColumnType::Float);
    assert_eq!(
        result.table.column("price").unwrap().cells[1],
        Cell::Float(2.0)
    );

    assert_eq!(result.types["label"], ColumnType::String);
    assert_eq!(
        result.table.column("label").unwrap().cells,
        vec![
            Cell::Text("red".into()),
            Cell::Missing,
            Cell::Missing,
            Cell::Text("blue".into())
        ]
    );
}

#[test]
fn test_input_table_is_not_modified() {
    let table = raw_table(&[("a", &["1", "x", "3"]), ("b", &["p", "q", ""])]);
    let before = table.clone();

    let _ = infer(&table, 0.6, 0.6).expect("Inference failed");

    assert_eq!(table, before);
}

#[test]
fn test_types_follow_column_order() {
    let table = raw_table(&[
        ("z", &["1"]),
        ("a", &["2021-01-01"]),
        ("m", &["text"]),
        ("q", &[""]),
    ]);

    let result = infer(&table, 0.6, 0.8).expect("Inference failed");

    let order: Vec<(&str, ColumnType)> = result
        .types
        .iter()
        .map(|(name, ty)| (name.as_str(), *ty))
        .collect();
    assert_eq!(
        order,
        vec![
            ("z", ColumnType::Integer),
            ("a", ColumnType::DateTime),
            ("m", ColumnType::String),
            ("q", ColumnType::Empty)
        ]
    );
}

#[test]
fn test_invalid_thresholds_rejected() {
    let table = raw_table(&[("a", &["1"])]);

    for (dt, num) in [(0.0, 0.8), (0.6, 1.01), (f64::NAN, 0.8), (-0.5, 0.5)] {
        let err = infer(&table, dt, num).unwrap_err();
        assert!(matches!(err, TabcleanError::Config(_)));
    }
}

// =============================================================================
// Pipeline Tests
// =============================================================================

#[test]
fn test_title_rows_reshape_and_infer() {
    let content = "Monthly sales,,\n\
                   ,,\n\
                   region,units,month\n\
                   north,10,2021-01\n\
                   south,12,2021-02\n\
                   east,n/a,2021-03\n";
    let file = create_test_file(content);

    let config = CleanerConfig {
        parser: ParserConfig {
            has_header: false,
            ..Default::default()
        },
        reshape: ReshapeOptions::new().skip_rows(2).header_from_first_row(true),
        inference: InferenceConfig::default(),
    };
    let cleaned = Cleaner::with_config(config)
        .clean_file(file.path())
        .expect("Clean failed");

    assert_eq!(cleaned.table().column_names(), vec!["region", "units", "month"]);
    assert_eq!(cleaned.result.column_type("region"), Some(ColumnType::String));
    assert_eq!(cleaned.result.column_type("units"), Some(ColumnType::Integer));
    assert_eq!(cleaned.result.column_type("month"), Some(ColumnType::DateTime));

    let units = cleaned.summary.column("units").unwrap();
    assert_eq!(units.missing, 1);
    assert_eq!(units.numeric.as_ref().unwrap().mean, 11.0);
}

#[test]
fn test_reshape_errors_surface() {
    let table = raw_table(&[("a", &["1", "2"])]);

    let too_many = ReshapeOptions::new().skip_rows(3);
    assert!(matches!(
        reshape(&table, &too_many),
        Err(TabcleanError::InvalidSelection(_))
    ));

    let unknown = ReshapeOptions::new().columns(["b"]);
    assert!(matches!(
        reshape(&table, &unknown),
        Err(TabcleanError::InvalidSelection(_))
    ));
}

#[test]
fn test_clean_then_export_csv() {
    let content = "when,amount,who\n\
                   2021-06-01,10,ann\n\
                   2021-06-02,12.5,bo\n\
                   junk,,cy\n";
    let file = create_test_file(content);

    let cleaned = Cleaner::new().clean_file(file.path()).expect("Clean failed");

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let out = dir.path().join("out.csv");
    Exporter::new(ExportFormat::Csv)
        .write_file(cleaned.table(), &out)
        .expect("Export failed");

    let written = std::fs::read_to_string(&out).expect("Failed to read output");
    assert_eq!(
        written,
        "when,amount,who\n\
         2021-06-01,10.0,ann\n\
         2021-06-02,12.5,bo\n\
         ,,cy\n"
    );
}

#[test]
fn test_cleaning_exported_output_is_stable() {
    let content = "id,score,seen,note\n\
                   1,0.5,2020-01-01 08:30:00,a\n\
                   2,x,2020-01-02 09:00:00,b\n\
                   3,1.5,,c\n\
                   4,2,2020-01-04 10:15:00,\n";
    let file = create_test_file(content);
    let cleaner = Cleaner::with_config(CleanerConfig {
        inference: InferenceConfig::new(0.6, 0.6),
        ..Default::default()
    });

    let first = cleaner.clean_file(file.path()).expect("Clean failed");
    let bytes = Exporter::new(ExportFormat::Csv)
        .to_bytes(first.table())
        .expect("Export failed");
    let exported = create_test_file(&String::from_utf8(bytes).unwrap());

    let second = cleaner.clean_file(exported.path()).expect("Clean failed");

    assert_eq!(first.result.types, second.result.types);
    assert_eq!(first.result.table, second.result.table);
}

#[test]
fn test_export_json() {
    let table = raw_table(&[("n", &["1", ""]), ("s", &["a", "b"])]);
    let result = infer(&table, 0.6, 0.8).expect("Inference failed");

    let bytes = Exporter::new(ExportFormat::Json)
        .to_bytes(&result.table)
        .expect("Export failed");
    let value: serde_json::Value = serde_json::from_slice(&bytes).expect("Invalid JSON");

    assert_eq!(
        value,
        serde_json::json!([
            {"n": 1, "s": "a"},
            {"n": null, "s": "b"}
        ])
    );
}

// =============================================================================
// Workbook Tests
// =============================================================================

#[cfg(feature = "excel")]
#[test]
fn test_xlsx_export_then_clean_again() {
    let content = "when,amount,who\n\
                   2021-06-01,10,ann\n\
                   2021-06-02,12.5,bo\n\
                   junk,,cy\n";
    let file = create_test_file(content);
    let first = Cleaner::new().clean_file(file.path()).expect("Clean failed");

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let workbook = dir.path().join("orders_cleaned.xlsx");
    Exporter::new(ExportFormat::Xlsx)
        .write_file(first.table(), &workbook)
        .expect("Export failed");

    let second = Cleaner::new().clean_file(&workbook).expect("Clean failed");

    assert_eq!(second.source.format, "xlsx");
    assert!(second.source.hash.starts_with("sha256:"));
    assert_eq!(first.result.types, second.result.types);
    assert_eq!(first.result.table, second.result.table);
}

#[cfg(not(feature = "excel"))]
#[test]
fn test_xlsx_input_requires_feature() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let workbook = dir.path().join("report.xlsx");
    std::fs::write(&workbook, b"PK\x03\x04").expect("Failed to write file");

    let err = Cleaner::new().load(&workbook).unwrap_err();
    assert!(matches!(err, TabcleanError::UnsupportedFormat(_)));
}
