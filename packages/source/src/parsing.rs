//! Lenient parsing of upstream scalar values.
//!
//! Government records are full of `"NA"`, empty strings, nulls and
//! malformed numbers. Every numeric field read from a
//! [`agri_data_source_models::RawRecord`] must go through [`sanitize`]
//! before it reaches arithmetic.

use serde_json::Value;

/// Placeholder strings meaning "no value". Compared case-insensitively
/// after trimming.
pub const MISSING_PLACEHOLDERS: &[&str] = &["NA", "N/A", "NULL"];

/// Converts an upstream value to a finite `f64`, falling back to
/// `default` for anything missing, placeholder, unparsable or
/// non-finite. Never fails.
#[must_use]
pub fn sanitize(value: Option<&Value>, default: f64) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(default),
        Some(Value::String(s)) => sanitize_str(s, default),
        _ => default,
    }
}

/// String form of [`sanitize`].
#[must_use]
pub fn sanitize_str(value: &str, default: f64) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() || is_placeholder(trimmed) {
        return default;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn is_placeholder(value: &str) -> bool {
    MISSING_PLACEHOLDERS
        .iter()
        .any(|p| p.eq_ignore_ascii_case(value))
}

/// Parses a year field. Accepts integer JSON numbers and integer strings;
/// everything else (including `"2005.0"`) is `None`.
#[must_use]
pub fn parse_year(value: Option<&Value>) -> Option<i32> {
    match value? {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}
