//! Fuzz target for cell coercion and column inference.
//!
//! This fuzzer tests that:
//! 1. The number and date parsers never panic on any text
//! 2. Inference over a column of fuzzed cells never panics
//! 3. Inference is idempotent on its own output

#![no_main]

use libfuzzer_sys::fuzz_target;
use tabclean::inference::coerce::{parse_datetime_str, parse_number_str};
use tabclean::{infer, Column, Table};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs
    if data.len() > 10_000 {
        return;
    }

    let text = String::from_utf8_lossy(data);

    let _ = parse_number_str(&text);
    let _ = parse_datetime_str(&text);

    // One cell per line, as a single column
    let values: Vec<&str> = text.lines().collect();
    let column = Column::from_raw("fuzz", &values);
    let Ok(table) = Table::new(vec![column]) else {
        return;
    };

    let Ok(once) = infer(&table, 0.6, 0.8) else {
        return;
    };

    // Literal missing markers legitimately shift ratios on a second pass
    if values.iter().any(|v| matches!(v.trim(), "nan" | "None")) {
        return;
    }

    if let Ok(twice) = infer(&once.table, 0.6, 0.8) {
        assert_eq!(once.types, twice.types);
        assert_eq!(once.table, twice.table);
    }
});
