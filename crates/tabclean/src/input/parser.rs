//! CSV/TSV loader with delimiter detection, and the xlsx entry point.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{Result, TabcleanError};
use crate::table::{unique_headers, Cell, Table};

use super::source::SourceMetadata;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Cell texts read as missing by default.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum data rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
    /// Cell texts (compared after trimming) that load as missing.
    pub na_values: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
            na_values: DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Loads delimited text into a raw [`Table`] of text and missing cells.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the table and its source metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| TabcleanError::io(path, e))?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| TabcleanError::io(path, e))?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let (table, format) = if is_workbook(path) {
            (self.parse_xlsx(&contents)?, "xlsx".to_string())
        } else {
            let delimiter = match self.config.delimiter {
                Some(d) => d,
                None => detect_delimiter(&contents)?,
            };
            let format = match delimiter {
                b'\t' => "tsv",
                b',' => "csv",
                b';' => "csv-semicolon",
                b'|' => "psv",
                _ => "delimited",
            };
            (self.parse_bytes(&contents, delimiter)?, format.to_string())
        };

        info!(
            path = %path.display(),
            %format,
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded table"
        );

        let source = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            format,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, source))
    }

    /// Parse in-memory text, detecting the delimiter unless configured.
    pub fn parse_str(&self, text: &str) -> Result<Table> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(text.as_bytes())?,
        };
        self.parse_bytes(text.as_bytes(), delimiter)
    }

    /// Parse bytes with a known delimiter.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let records = reader.byte_records().map(|record| {
            record
                .map(|fields| fields.iter().map(|f| Cell::Text(decode(f))).collect::<Vec<Cell>>())
                .map_err(TabcleanError::from)
        });

        let table = self.assemble(records)?;
        debug!(
            rows = table.row_count(),
            columns = table.column_count(),
            "parsed delimited data"
        );
        Ok(table)
    }

    /// Parse the first sheet of an xlsx workbook held in memory.
    #[cfg(feature = "excel")]
    pub fn parse_xlsx(&self, bytes: &[u8]) -> Result<Table> {
        super::workbook::parse_first_sheet(self, bytes)
    }

    /// Parse the first sheet of an xlsx workbook held in memory.
    #[cfg(not(feature = "excel"))]
    pub fn parse_xlsx(&self, _bytes: &[u8]) -> Result<Table> {
        Err(TabcleanError::UnsupportedFormat(
            "xlsx support not enabled. Rebuild with --features excel".to_string(),
        ))
    }

    /// Build a table from rows of raw cells: header row, NA tokens, ragged
    /// rows and the row limit are handled here for every input format.
    pub(super) fn assemble<I>(&self, mut records: I) -> Result<Table>
    where
        I: Iterator<Item = Result<Vec<Cell>>>,
    {
        let first = match records.next() {
            Some(record) => record?,
            None => return Err(TabcleanError::EmptyData("No rows found".to_string())),
        };

        let (headers, mut pending) = if self.config.has_header {
            (unique_headers(first.iter().map(header_name).collect()), None)
        } else {
            (unique_headers(vec![None; first.len()]), Some(first))
        };

        if headers.is_empty() {
            return Err(TabcleanError::EmptyData("No columns found".to_string()));
        }

        let width = headers.len();
        let mut rows: Vec<Vec<Cell>> = Vec::new();

        loop {
            if let Some(max) = self.config.max_rows {
                if rows.len() >= max {
                    break;
                }
            }

            let fields = match pending.take() {
                Some(fields) => fields,
                None => match records.next() {
                    Some(record) => record?,
                    None => break,
                },
            };

            let mut row: Vec<Cell> = fields.into_iter().map(|c| self.normalize(c)).collect();

            // Pad short rows, truncate long ones
            row.resize(width, Cell::Missing);
            rows.push(row);
        }

        Table::from_rows(headers, rows)
    }

    /// Check if a field should load as missing.
    pub fn is_na_value(&self, value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty() || self.config.na_values.iter().any(|na| na == trimmed)
    }

    fn normalize(&self, cell: Cell) -> Cell {
        match cell {
            Cell::Text(value) if self.is_na_value(&value) => Cell::Missing,
            other => other,
        }
    }
}

fn decode(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

/// Column name from a header cell. Whole numbers drop the `.0`.
fn header_name(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Float(v) if v.is_finite() => Some(v.to_string()),
        other => other.render(),
    }
}

/// Files read as xlsx workbooks, judged by extension.
fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xlsm"))
}

/// Detect the delimiter by analyzing the first few lines.
pub fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(10)
        .collect();

    if lines.is_empty() {
        return Err(TabcleanError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tab gets a small bonus
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
