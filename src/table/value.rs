//! Cell values held by a [`Column`](super::Column).
//!
//! Values are format-agnostic: every loader converts its native cells into
//! this enum, and the query engine never looks past it.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde_json::Value as JsonValue;

/// Label substituted for nulls whenever a column is viewed as text
pub const NULL_LABEL: &str = "(null)";

/// A single cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Date(NaiveDate),
    /// Wall-clock timestamp; tz-aware sources are normalised to UTC
    DateTime(NaiveDateTime),
    /// Fixed-point number: `mantissa * 10^-scale`
    Decimal { mantissa: i128, scale: i8 },
    Binary(Vec<u8>),
    /// List, struct or map value, kept as a JSON tree
    Nested(JsonValue),
    /// Anything else, preserved as an opaque display string
    Other(String),
}

impl Value {
    /// Returns true for null cells
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Native numeric view used by numeric filters and statistics.
    ///
    /// Only integer, float and decimal cells have one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Decimal { mantissa, scale } => Some(decimal_to_f64(*mantissa, *scale)),
            _ => None,
        }
    }

    /// String representation of the cell, or `None` for null.
    ///
    /// This is the "cast to string" view: numbers, booleans and dates all
    /// become filterable text.
    pub fn to_text(&self) -> Option<String> {
        let text = match self {
            Value::Null => return None,
            Value::Int(v) => v.to_string(),
            Value::Float(v) => format_float(*v),
            Value::Str(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::DateTime(dt) => format_datetime(dt, ' '),
            Value::Decimal { mantissa, scale } => format_decimal(*mantissa, *scale),
            Value::Binary(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Value::Nested(json) => json.to_string(),
            Value::Other(s) => s.clone(),
        };
        Some(text)
    }

    /// Text view with nulls rendered as [`NULL_LABEL`]
    pub fn to_text_or_null_label(&self) -> String {
        self.to_text().unwrap_or_else(|| NULL_LABEL.to_string())
    }

    /// Total order over non-null values of the same column.
    ///
    /// Floats use IEEE total ordering. Values of different kinds (which a
    /// well-formed column never mixes) fall back to a fixed kind order.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).total_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.total_cmp(&(*b as f64)),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (
                Value::Decimal { mantissa: a, scale: sa },
                Value::Decimal { mantissa: b, scale: sb },
            ) => {
                if sa == sb {
                    a.cmp(b)
                } else {
                    decimal_to_f64(*a, *sa).total_cmp(&decimal_to_f64(*b, *sb))
                }
            }
            (Value::Binary(a), Value::Binary(b)) => a.cmp(b),
            (Value::Nested(a), Value::Nested(b)) => a.to_string().cmp(&b.to_string()),
            (Value::Other(a), Value::Other(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) | Value::Decimal { .. } => 2,
            Value::Date(_) => 3,
            Value::DateTime(_) => 4,
            Value::Str(_) => 5,
            Value::Binary(_) => 6,
            Value::Nested(_) => 7,
            Value::Other(_) => 8,
        }
    }
}

pub(crate) fn decimal_to_f64(mantissa: i128, scale: i8) -> f64 {
    mantissa as f64 / 10f64.powi(i32::from(scale))
}

/// Formats a decimal mantissa/scale pair without going through floating point
pub(crate) fn format_decimal(mantissa: i128, scale: i8) -> String {
    if scale <= 0 {
        let mut out = mantissa.to_string();
        if mantissa != 0 {
            out.extend(std::iter::repeat('0').take(scale.unsigned_abs() as usize));
        }
        return out;
    }

    let scale = scale as usize;
    let digits = mantissa.unsigned_abs().to_string();
    let digits = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (int_part, frac_part) = digits.split_at(digits.len() - scale);
    let sign = if mantissa < 0 { "-" } else { "" };
    format!("{}{}.{}", sign, int_part, frac_part)
}

/// Shortest round-tripping float text; integral values drop the fraction
pub(crate) fn format_float(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        v.to_string()
    }
}

/// Formats a timestamp as `date{sep}time`, adding microseconds only when present
pub(crate) fn format_datetime(dt: &NaiveDateTime, sep: char) -> String {
    let mut out = format!(
        "{}{}{}",
        dt.format("%Y-%m-%d"),
        sep,
        dt.format("%H:%M:%S")
    );
    let micros = dt.nanosecond() / 1_000;
    if micros != 0 {
        out.push_str(&format!(".{:06}", micros));
    }
    out
}
