//! Single-sheet xlsx export.

use std::io::Write;

use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet};

use super::is_date_only;
use crate::error::{Result, TabcleanError};
use crate::table::{Cell, Column, Table};

const DATE_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

pub(super) fn write_xlsx<W: Write>(table: &Table, mut writer: W) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (index, column) in table.columns().iter().enumerate() {
        let col = ColNum::try_from(index)
            .map_err(|_| TabcleanError::Excel(format!("too many columns: {}", index + 1)))?;
        write_column(worksheet, col, column)?;
    }

    let buffer = workbook.save_to_buffer().map_err(excel_error)?;
    writer.write_all(&buffer).map_err(excel_error)?;
    Ok(())
}

fn write_column(worksheet: &mut Worksheet, col: ColNum, column: &Column) -> Result<()> {
    let format = if is_date_only(column) {
        Format::new().set_num_format(DATE_FORMAT)
    } else {
        Format::new().set_num_format(DATETIME_FORMAT)
    };

    worksheet
        .write_string(0, col, column.name.as_str())
        .map_err(excel_error)?;

    for (index, cell) in column.cells.iter().enumerate() {
        // Row 0 holds the header.
        let row = RowNum::try_from(index + 1)
            .map_err(|_| TabcleanError::Excel(format!("too many rows: {}", index + 1)))?;
        let written = match cell {
            Cell::Missing => continue,
            Cell::Float(v) if !v.is_finite() => continue,
            Cell::Text(s) => worksheet.write_string(row, col, s.as_str()),
            Cell::Integer(v) => worksheet.write_number(row, col, *v as f64),
            Cell::Float(v) => worksheet.write_number(row, col, *v),
            Cell::DateTime(dt) => worksheet.write_datetime_with_format(row, col, dt, &format),
        };
        written.map_err(excel_error)?;
    }
    Ok(())
}

fn excel_error(err: impl std::fmt::Display) -> TabcleanError {
    TabcleanError::Excel(err.to_string())
}
