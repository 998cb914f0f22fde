//! Numeric coercion over JSON field values.
//!
//! Records are JSON objects, so every value reaching the evaluator is a
//! `serde_json::Value`. Coercion mirrors the record contract: anything
//! that is not a usable number becomes `0.0` rather than an error.

use serde_json::Value;

/// Coerce an (optional) field value to a number.
///
/// `None`, `Null` and the empty string coerce to `0.0`; numbers pass
/// through; booleans map to `1.0`/`0.0`; strings go through a trimmed
/// `f64` parse, falling back to `0.0` when unparseable or non-finite.
/// Arrays and objects have no numeric reading and coerce to `0.0`.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        None | Some(Value::Null) => 0.0,
        Some(Value::Number(n)) => finite_or_zero(n.as_f64().unwrap_or(0.0)),
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::String(s)) => {
            if s.is_empty() {
                0.0
            } else {
                s.trim().parse::<f64>().map(finite_or_zero).unwrap_or(0.0)
            }
        }
        Some(Value::Array(_)) | Some(Value::Object(_)) => 0.0,
    }
}

/// Clamp non-finite results (NaN, ±∞) to `0.0`.
pub fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() { n } else { 0.0 }
}

/// Build a JSON number from an `f64`, routing non-finite input through
/// `0.0` (JSON has no NaN/Infinity representation).
pub fn number_value(n: f64) -> Value {
    let n = finite_or_zero(n);
    match serde_json::Number::from_f64(n) {
        Some(num) => Value::Number(num),
        None => Value::Number(serde_json::Number::from(0)),
    }
}
