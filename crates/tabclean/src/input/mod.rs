//! Input parsing and data source handling.

mod parser;
mod source;
#[cfg(feature = "excel")]
mod workbook;

pub use parser::{detect_delimiter, Parser, ParserConfig, DEFAULT_NA_VALUES};
pub use source::SourceMetadata;
