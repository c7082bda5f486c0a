//! Serialization of cleaned tables to delimited text, JSON, Parquet and xlsx.

mod json;
#[cfg(feature = "parquet")]
mod columnar;
#[cfg(feature = "excel")]
mod workbook;

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use tracing::info;

use crate::error::{Result, TabcleanError};
use crate::table::{format_datetime, format_float, Cell, Column, ColumnType, Table};

/// Suffix appended to the source file stem for exported files.
pub const CLEANED_SUFFIX: &str = "_cleaned";

/// Output format for exported tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
    Json,
    /// Requires the `parquet` feature.
    Parquet,
    /// Requires the `excel` feature.
    Xlsx,
}

impl ExportFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
            ExportFormat::Parquet => "parquet",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// Cargo feature that enables the format, if it needs one.
    pub fn feature(&self) -> Option<&'static str> {
        match self {
            ExportFormat::Parquet => Some("parquet"),
            ExportFormat::Xlsx => Some("excel"),
            _ => None,
        }
    }

    /// Whether this build can write the format.
    pub fn is_available(&self) -> bool {
        match self {
            ExportFormat::Parquet => cfg!(feature = "parquet"),
            ExportFormat::Xlsx => cfg!(feature = "excel"),
            _ => true,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            "json" => Ok(ExportFormat::Json),
            "parquet" => Ok(ExportFormat::Parquet),
            "xlsx" => Ok(ExportFormat::Xlsx),
            _ => Err(format!(
                "Unknown format: {}. Use csv, tsv, json, parquet, or xlsx.",
                s
            )),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// File name for the cleaned version of `source`: `<stem>_cleaned.<ext>`.
pub fn export_file_name(source: impl AsRef<Path>, format: ExportFormat) -> String {
    let stem = source
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());
    format!("{}{}.{}", stem, CLEANED_SUFFIX, format.extension())
}

/// Output path for the cleaned version of `source`, placed in `output_dir`
/// when given, otherwise next to the source file.
pub fn export_path(
    source: impl AsRef<Path>,
    output_dir: Option<&Path>,
    format: ExportFormat,
) -> PathBuf {
    let source = source.as_ref();
    let name = export_file_name(source, format);
    match output_dir {
        Some(dir) => dir.join(name),
        None => source.with_file_name(name),
    }
}

/// Writes tables in one output format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exporter {
    format: ExportFormat,
}

impl Exporter {
    /// Create an exporter for a format.
    pub fn new(format: ExportFormat) -> Self {
        Self { format }
    }

    /// The output format.
    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Serialize `table` into `writer`.
    pub fn write<W: Write + Send>(&self, table: &Table, writer: W) -> Result<()> {
        match self.format {
            ExportFormat::Csv => write_delimited(table, writer, b','),
            ExportFormat::Tsv => write_delimited(table, writer, b'\t'),
            ExportFormat::Json => json::write_json(table, writer),
            ExportFormat::Parquet => write_parquet(table, writer),
            ExportFormat::Xlsx => write_xlsx(table, writer),
        }
    }

    /// Serialize `table` into a byte buffer.
    pub fn to_bytes(&self, table: &Table) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(table, &mut buffer)?;
        Ok(buffer)
    }

    /// Serialize `table` into a new file at `path`.
    pub fn write_file(&self, table: &Table, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !self.format.is_available() {
            return Err(unavailable(self.format));
        }

        let file = File::create(path).map_err(|e| TabcleanError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        self.write(table, &mut writer)?;
        writer.flush().map_err(|e| TabcleanError::io(path, e))?;

        info!(
            path = %path.display(),
            format = %self.format,
            rows = table.row_count(),
            "exported table"
        );
        Ok(())
    }
}

fn unavailable(format: ExportFormat) -> TabcleanError {
    TabcleanError::UnsupportedFormat(format!(
        "{} support not enabled. Rebuild with --features {}",
        format,
        format.feature().unwrap_or_default()
    ))
}

#[cfg(feature = "parquet")]
fn write_parquet<W: Write + Send>(table: &Table, writer: W) -> Result<()> {
    columnar::write_parquet(table, writer)
}

#[cfg(not(feature = "parquet"))]
fn write_parquet<W: Write + Send>(_table: &Table, _writer: W) -> Result<()> {
    Err(unavailable(ExportFormat::Parquet))
}

#[cfg(feature = "excel")]
fn write_xlsx<W: Write + Send>(table: &Table, writer: W) -> Result<()> {
    workbook::write_xlsx(table, writer)
}

#[cfg(not(feature = "excel"))]
fn write_xlsx<W: Write + Send>(_table: &Table, _writer: W) -> Result<()> {
    Err(unavailable(ExportFormat::Xlsx))
}

fn write_delimited<W: Write>(table: &Table, writer: W, delimiter: u8) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    if table.column_count() == 0 {
        return Ok(());
    }

    csv_writer.write_record(table.column_names())?;

    let formatters: Vec<CellFormatter> = table.columns().iter().map(CellFormatter::for_column).collect();
    for row in 0..table.row_count() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .zip(&formatters)
            .map(|(column, formatter)| formatter.format(&column.cells[row]))
            .collect();
        csv_writer.write_record(&record)?;
    }

    csv_writer
        .flush()
        .map_err(|e| TabcleanError::Csv(csv::Error::from(e)))?;
    Ok(())
}

/// Per-column text formatting for delimited output.
struct CellFormatter {
    date_only: bool,
}

impl CellFormatter {
    fn for_column(column: &Column) -> Self {
        Self {
            date_only: is_date_only(column),
        }
    }

    fn format(&self, cell: &Cell) -> String {
        match cell {
            Cell::Missing => String::new(),
            Cell::Float(v) if v.is_nan() => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Integer(v) => v.to_string(),
            Cell::Float(v) => format_float(*v),
            Cell::DateTime(dt) if self.date_only => dt.format("%Y-%m-%d").to_string(),
            Cell::DateTime(dt) => format_datetime(dt),
        }
    }
}

/// True when the column holds datetimes that all fall on midnight.
fn is_date_only(column: &Column) -> bool {
    let mut any = false;
    for cell in column.non_missing() {
        match cell {
            Cell::DateTime(dt) if is_midnight(dt) => any = true,
            _ => return false,
        }
    }
    any
}

fn is_midnight(dt: &NaiveDateTime) -> bool {
    dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0 && dt.nanosecond() == 0
}

/// Physical type of a column, judged from its cells. Integer and float
/// cells mixed together widen to float; anything else mixed is text.
pub fn storage_type(column: &Column) -> ColumnType {
    let mut kind = ColumnType::Empty;
    for cell in column.non_missing() {
        let cell_kind = match cell {
            Cell::Integer(_) => ColumnType::Integer,
            Cell::Float(_) => ColumnType::Float,
            Cell::DateTime(_) => ColumnType::DateTime,
            _ => return ColumnType::String,
        };
        kind = match (kind, cell_kind) {
            (ColumnType::Empty, k) => k,
            (a, b) if a == b => a,
            (ColumnType::Integer, ColumnType::Float) | (ColumnType::Float, ColumnType::Integer) => {
                ColumnType::Float
            }
            _ => return ColumnType::String,
        };
    }
    kind
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32) -> Cell {
        Cell::DateTime(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
        )
    }

    fn cleaned() -> Table {
        Table::new(vec![
            Column::new("id", vec![Cell::Integer(1), Cell::Missing]),
            Column::new("score", vec![Cell::Float(2.0), Cell::Float(3.25)]),
            Column::new("day", vec![dt(2021, 1, 5, 0), Cell::Missing]),
            Column::new("at", vec![dt(2021, 1, 5, 0), dt(2021, 1, 6, 14)]),
            Column::new("note", vec![Cell::Text("a, b".into()), Cell::Missing]),
        ])
        .unwrap()
    }

    #[test]
    fn test_format_round_trip_names() {
        for format in ["csv", "tsv", "json", "parquet", "xlsx"] {
            let parsed: ExportFormat = format.parse().unwrap();
            assert_eq!(parsed.to_string(), format);
        }
        assert!("xls".parse::<ExportFormat>().is_err());
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
    }

    #[test]
    fn test_export_paths() {
        assert_eq!(
            export_file_name("uploads/report.xlsx", ExportFormat::Csv),
            "report_cleaned.csv"
        );
        assert_eq!(
            export_path("uploads/report.csv", None, ExportFormat::Json),
            PathBuf::from("uploads/report_cleaned.json")
        );
        assert_eq!(
            export_path(
                "uploads/report.csv",
                Some(Path::new("/tmp/out")),
                ExportFormat::Tsv
            ),
            PathBuf::from("/tmp/out/report_cleaned.tsv")
        );
    }

    #[test]
    fn test_write_csv() {
        let bytes = Exporter::new(ExportFormat::Csv).to_bytes(&cleaned()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "id,score,day,at,note\n\
             1,2.0,2021-01-05,2021-01-05 00:00:00,\"a, b\"\n\
             ,3.25,,2021-01-06 14:00:00,\n"
        );
    }

    #[test]
    fn test_write_tsv() {
        let bytes = Exporter::new(ExportFormat::Tsv).to_bytes(&cleaned()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("id\tscore\tday\tat\tnote\n"));
        assert!(text.contains("1\t2.0\t2021-01-05\t"));
    }

    #[test]
    fn test_write_empty_table() {
        let bytes = Exporter::new(ExportFormat::Csv)
            .to_bytes(&Table::default())
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_storage_type() {
        let table = cleaned();
        let kinds: Vec<ColumnType> = table.columns().iter().map(storage_type).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnType::Integer,
                ColumnType::Float,
                ColumnType::DateTime,
                ColumnType::DateTime,
                ColumnType::String
            ]
        );

        let mixed = Column::new("m", vec![Cell::Integer(1), Cell::Float(1.5)]);
        assert_eq!(storage_type(&mixed), ColumnType::Float);
        let blank = Column::new("b", vec![Cell::Missing]);
        assert_eq!(storage_type(&blank), ColumnType::Empty);
    }

    #[cfg(not(feature = "parquet"))]
    #[test]
    fn test_parquet_requires_feature() {
        let err = Exporter::new(ExportFormat::Parquet)
            .to_bytes(&cleaned())
            .unwrap_err();
        assert!(matches!(err, TabcleanError::UnsupportedFormat(_)));
        assert!(!ExportFormat::Parquet.is_available());
    }

    #[cfg(not(feature = "excel"))]
    #[test]
    fn test_xlsx_requires_feature() {
        let err = Exporter::new(ExportFormat::Xlsx)
            .to_bytes(&cleaned())
            .unwrap_err();
        assert!(err.to_string().contains("--features excel"));
        assert!(!ExportFormat::Xlsx.is_available());
    }

    #[test]
    fn test_nan_float_exports_blank() {
        let table = Table::new(vec![
            Column::new("x", vec![Cell::Float(1.5), Cell::Float(f64::NAN)]),
            Column::new("y", vec![Cell::Text("a".into()), Cell::Text("b".into())]),
        ])
        .unwrap();
        let bytes = Exporter::new(ExportFormat::Csv).to_bytes(&table).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "x,y\n1.5,a\n,b\n");
    }
}
