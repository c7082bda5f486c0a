//! In-memory table model: cells, columns, tables and type tags.

mod cell;
mod column;
#[allow(clippy::module_inception)]
mod table;
mod types;

pub use cell::{format_datetime, format_float, Cell};
pub use column::Column;
pub use table::{unique_headers, Table};
pub use types::ColumnType;
