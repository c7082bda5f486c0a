//! JSON export: an array of row objects keyed by column name.

use std::io::Write;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::Result;
use crate::table::{Cell, Table};

/// Datetime layout used in JSON output.
pub const JSON_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub(super) fn write_json<W: Write>(table: &Table, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, &Rows(table))?;
    Ok(())
}

struct Rows<'a>(&'a Table);

impl Serialize for Rows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let rows = self.0.row_count();
        let mut seq = serializer.serialize_seq(Some(rows))?;
        for index in 0..rows {
            seq.serialize_element(&Row {
                table: self.0,
                index,
            })?;
        }
        seq.end()
    }
}

/// One row, serialized with keys in column order.
struct Row<'a> {
    table: &'a Table,
    index: usize,
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let columns = self.table.columns();
        let mut map = serializer.serialize_map(Some(columns.len()))?;
        for column in columns {
            map.serialize_entry(&column.name, &JsonCell(&column.cells[self.index]))?;
        }
        map.end()
    }
}

struct JsonCell<'a>(&'a Cell);

impl Serialize for JsonCell<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            Cell::Missing => serializer.serialize_none(),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Integer(v) => serializer.serialize_i64(*v),
            Cell::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            Cell::Float(_) => serializer.serialize_none(),
            Cell::DateTime(dt) => {
                serializer.collect_str(&dt.format(JSON_DATETIME_FORMAT))
            }
        }
    }
}
