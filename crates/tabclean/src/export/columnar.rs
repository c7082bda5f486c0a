//! Parquet export through Arrow record batches.

use std::io::Write;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use parquet::arrow::ArrowWriter;

use super::storage_type;
use crate::error::{Result, TabcleanError};
use crate::table::{Cell, Column, ColumnType, Table};

pub(super) fn write_parquet<W: Write + Send>(table: &Table, writer: W) -> Result<()> {
    let mut fields = Vec::with_capacity(table.column_count());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.column_count());

    for column in table.columns() {
        let (data_type, array) = column_array(column);
        fields.push(Field::new(&column.name, data_type, true));
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    let options = RecordBatchOptions::new().with_row_count(Some(table.row_count()));
    let batch = RecordBatch::try_new_with_options(schema.clone(), arrays, &options)
        .map_err(|e| TabcleanError::Parquet(e.to_string()))?;

    let mut writer = ArrowWriter::try_new(writer, schema, None)
        .map_err(|e| TabcleanError::Parquet(e.to_string()))?;
    writer
        .write(&batch)
        .map_err(|e| TabcleanError::Parquet(e.to_string()))?;
    writer
        .close()
        .map_err(|e| TabcleanError::Parquet(e.to_string()))?;
    Ok(())
}

fn column_array(column: &Column) -> (DataType, ArrayRef) {
    match storage_type(column) {
        ColumnType::Integer => {
            let values: Vec<Option<i64>> = column
                .cells
                .iter()
                .map(|cell| match cell {
                    Cell::Integer(v) => Some(*v),
                    _ => None,
                })
                .collect();
            (DataType::Int64, Arc::new(Int64Array::from(values)))
        }
        ColumnType::Float => {
            let values: Vec<Option<f64>> = column
                .cells
                .iter()
                .map(|cell| match cell {
                    Cell::Integer(v) => Some(*v as f64),
                    Cell::Float(v) if !v.is_nan() => Some(*v),
                    _ => None,
                })
                .collect();
            (DataType::Float64, Arc::new(Float64Array::from(values)))
        }
        ColumnType::DateTime => {
            let values: Vec<Option<i64>> = column
                .cells
                .iter()
                .map(|cell| match cell {
                    Cell::DateTime(dt) => Some(dt.and_utc().timestamp_micros()),
                    _ => None,
                })
                .collect();
            (
                DataType::Timestamp(TimeUnit::Microsecond, None),
                Arc::new(TimestampMicrosecondArray::from(values)),
            )
        }
        ColumnType::String | ColumnType::Empty => {
            let values: Vec<Option<String>> = column.cells.iter().map(Cell::render).collect();
            (DataType::Utf8, Arc::new(StringArray::from(values)))
        }
    }
}
