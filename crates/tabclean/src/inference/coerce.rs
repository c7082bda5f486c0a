//! Per-cell coercion used by the inference trials.
//!
//! Both parsers are total: a value that does not fit simply yields `None`.
//!
//! # Numbers
//!
//! Text is trimmed and must match: optional `+`/`-`, digits (optionally
//! grouped with `,` in well-formed groups of three), an optional fraction
//! and an optional exponent. `nan`, `inf`, currency and percent signs are
//! rejected. Whole text without fraction or exponent that fits in `i64` is
//! kept exact.
//!
//! # Dates and times
//!
//! Text is trimmed and tried against this bounded list, in order. Every
//! form needs a four-digit year between 1000 and 2999, so version codes
//! such as `1-2-3` and two-digit years such as `03/10/21` stay text.
//!
//! | form                                   | example                      |
//! |----------------------------------------|------------------------------|
//! | RFC 3339 with offset (stored as UTC)   | `2021-03-10T08:30:00+02:00`  |
//! | ISO datetime, optional seconds/fraction| `2021-03-10 08:30`, `2021-03-10T08:30:15.25` |
//! | ISO date                               | `2021-03-10`, `2021/03/10`   |
//! | month-first, optional time             | `03/10/2021`, `3-10-2021 08:30` |
//! | day-first, when month-first fails      | `25/12/2021`, `25-12-2021`   |
//! | month names                            | `10 Mar 2021`, `Mar 10, 2021`, `10-Mar-2021` |
//! | year-month                             | `2021-03` (first of month)   |
//! | bare year                              | `2021` (January 1)           |
//!
//! Numeric cells never parse as datetimes; only text and datetime cells do.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::table::Cell;

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================

static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[+-]?(?:(?:[0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$",
    )
    .unwrap()
});

static YEAR_MONTH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})[-/]([0-9]{1,2})$").unwrap());

static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").unwrap());

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m-%d-%Y %H:%M:%S%.f",
    "%m-%d-%Y %H:%M",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S%.f",
    "%d-%m-%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%b %d %Y",
];

/// Longest text considered by the date parser.
const MAX_DATE_LEN: usize = 64;

/// Years accepted by every date form.
const MIN_YEAR: i32 = 1000;
const MAX_YEAR: i32 = 2999;

/// A successfully parsed number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// True when the value has no fractional part and fits in `i64`.
    pub fn is_integral(&self) -> bool {
        match self {
            Number::Int(_) => true,
            Number::Float(v) => float_to_i64(*v).is_some(),
        }
    }

    /// Exact integer value, when integral.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Number::Int(v) => Some(*v),
            Number::Float(v) => float_to_i64(*v),
        }
    }

    /// Value as a float.
    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Int(v) => *v as f64,
            Number::Float(v) => *v,
        }
    }
}

fn float_to_i64(value: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is out of range.
    const LOWER: f64 = i64::MIN as f64;
    const UPPER: f64 = 9_223_372_036_854_775_808.0;

    if value.is_finite() && value.fract() == 0.0 && value >= LOWER && value < UPPER {
        Some(value as i64)
    } else {
        None
    }
}

/// Parse a cell as a number.
pub fn parse_number(cell: &Cell) -> Option<Number> {
    match cell {
        Cell::Integer(v) => Some(Number::Int(*v)),
        Cell::Float(v) if v.is_finite() => Some(Number::Float(*v)),
        Cell::Text(s) => parse_number_str(s),
        _ => None,
    }
}

/// Parse text as a number.
pub fn parse_number_str(value: &str) -> Option<Number> {
    let trimmed = value.trim();
    if !NUMBER_PATTERN.is_match(trimmed) {
        return None;
    }

    let cleaned = trimmed.replace(',', "");
    if !cleaned.contains(['.', 'e', 'E']) {
        if let Ok(v) = cleaned.parse::<i64>() {
            return Some(Number::Int(v));
        }
    }

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Number::Float)
}

/// Parse a cell as a date/time.
pub fn parse_datetime(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::DateTime(dt) => Some(*dt),
        Cell::Text(s) => parse_datetime_str(s),
        _ => None,
    }
}

/// Parse text as a date/time using the documented format list.
pub fn parse_datetime_str(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.len() > MAX_DATE_LEN || !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    parse_datetime_forms(trimmed).filter(|dt| (MIN_YEAR..=MAX_YEAR).contains(&dt.year()))
}

// chrono's `%Y` takes any number of digits, so the year range is checked
// on the result.
fn parse_datetime_forms(trimmed: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    if let Some(caps) = YEAR_MONTH_PATTERN.captures(trimmed) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0);
    }

    if YEAR_PATTERN.is_match(trimmed) {
        let year: i32 = trimmed.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0);
    }

    None
}
