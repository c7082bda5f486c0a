//! Type inference engine: decides whether each column holds dates, numbers
//! or text, and casts it accordingly.

pub mod coerce;
mod engine;

pub use coerce::Number;
pub use engine::{infer, ColumnReport, InferenceConfig, InferenceResult, TypeInference};
