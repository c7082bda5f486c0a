//! Fuzz target for the data parser.
//!
//! This fuzzer tests that the CSV/TSV parser:
//! 1. Never panics on malformed input
//! 2. Handles all delimiter combinations
//! 3. Produces tables that the cleaner and exporters accept

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Write;
use tabclean::{Cleaner, ExportFormat, Exporter};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    // Write to temp file for parsing
    if let Ok(mut temp_file) = tempfile::NamedTempFile::new() {
        if temp_file.write_all(data).is_ok() {
            let cleaner = Cleaner::new();
            if let Ok(cleaned) = cleaner.clean_file(temp_file.path()) {
                let _ = Exporter::new(ExportFormat::Csv).to_bytes(cleaned.table());
                let _ = Exporter::new(ExportFormat::Json).to_bytes(cleaned.table());
            }
        }
    }
});
