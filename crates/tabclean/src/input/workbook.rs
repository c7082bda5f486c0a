//! First-sheet xlsx loader.
//!
//! Only the used range of the first worksheet is read. Cells keep the
//! type stored in the workbook: numbers load as floats, date-formatted
//! numbers as datetimes, and text goes through the same NA tokens as
//! delimited input.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use tracing::debug;

use crate::error::{Result, TabcleanError};
use crate::inference::coerce::parse_datetime_str;
use crate::table::{Cell, Table};

use super::parser::Parser;

pub(super) fn parse_first_sheet(parser: &Parser, bytes: &[u8]) -> Result<Table> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).map_err(excel_error)?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(excel_error)?,
        None => return Err(TabcleanError::EmptyData("Workbook has no sheets".to_string())),
    };

    let rows = range
        .rows()
        .map(|row| Ok::<_, TabcleanError>(row.iter().map(to_cell).collect::<Vec<Cell>>()));
    let table = parser.assemble(rows)?;

    debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        "parsed first worksheet"
    );
    Ok(table)
}

fn to_cell(value: &Data) -> Cell {
    match value {
        Data::Empty | Data::Error(_) => Cell::Missing,
        Data::Int(v) => Cell::Integer(*v),
        Data::Float(v) => Cell::Float(*v),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => dt.as_datetime().map(Cell::DateTime).unwrap_or(Cell::Missing),
        Data::DateTimeIso(s) => parse_datetime_str(s)
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

fn excel_error(err: impl std::fmt::Display) -> TabcleanError {
    TabcleanError::Excel(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::coerce::parse_number;
    use crate::input::ParserConfig;
    use chrono::NaiveDate;
    use rust_xlsxwriter::{Format, Workbook};

    fn whole(cell: Option<&Cell>) -> Option<i64> {
        cell.and_then(parse_number).and_then(|n| n.to_i64())
    }

    fn workbook_bytes(build: impl FnOnce(&mut rust_xlsxwriter::Worksheet)) -> Vec<u8> {
        let mut workbook = Workbook::new();
        build(workbook.add_worksheet());
        workbook.add_worksheet().write_string(0, 0, "ignored").unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_first_sheet_typed_cells() {
        let day = NaiveDate::from_ymd_opt(2021, 3, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let bytes = workbook_bytes(|sheet| {
            let date = Format::new().set_num_format("yyyy-mm-dd");
            sheet.write_string(0, 0, "name").unwrap();
            sheet.write_string(0, 1, "count").unwrap();
            sheet.write_string(0, 2, "seen").unwrap();
            sheet.write_string(1, 0, "ann").unwrap();
            sheet.write_number(1, 1, 3).unwrap();
            sheet.write_datetime_with_format(1, 2, &day, &date).unwrap();
            sheet.write_string(2, 0, "n/a").unwrap();
            sheet.write_number(2, 1, 4.5).unwrap();
        });

        let table = Parser::new().parse_xlsx(&bytes).unwrap();

        assert_eq!(table.column_names(), vec!["name", "count", "seen"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 0), Some(&Cell::Text("ann".into())));
        assert_eq!(whole(table.get(0, 1)), Some(3));
        assert_eq!(table.get(0, 2), Some(&Cell::DateTime(day)));
        assert_eq!(table.get(1, 0), Some(&Cell::Missing));
        assert_eq!(table.get(1, 1), Some(&Cell::Float(4.5)));
        assert_eq!(table.get(1, 2), Some(&Cell::Missing));
    }

    #[test]
    fn test_numeric_headers_and_no_header_mode() {
        let bytes = workbook_bytes(|sheet| {
            sheet.write_number(0, 0, 2021).unwrap();
            sheet.write_number(0, 1, 2022).unwrap();
            sheet.write_number(1, 0, 1).unwrap();
            sheet.write_boolean(1, 1, true).unwrap();
        });

        let table = Parser::new().parse_xlsx(&bytes).unwrap();
        assert_eq!(table.column_names(), vec!["2021", "2022"]);
        assert_eq!(table.get(0, 1), Some(&Cell::Text("TRUE".into())));

        let config = ParserConfig {
            has_header: false,
            ..ParserConfig::default()
        };
        let table = Parser::with_config(config).parse_xlsx(&bytes).unwrap();
        assert_eq!(table.column_names(), vec!["column_1", "column_2"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(whole(table.get(0, 0)), Some(2021));
    }

    #[test]
    fn test_empty_sheet_and_bad_bytes() {
        let bytes = workbook_bytes(|_| {});
        let err = Parser::new().parse_xlsx(&bytes).unwrap_err();
        assert!(matches!(err, TabcleanError::EmptyData(_)));

        let err = Parser::new().parse_xlsx(b"not a workbook").unwrap_err();
        assert!(matches!(err, TabcleanError::Excel(_)));
    }
}
