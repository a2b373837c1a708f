//! Per-column descriptive statistics
//!
//! Base counts are always reported. The type-specific extension is computed
//! best-effort: every statistic is an independent optional value, and one
//! that cannot be computed is omitted (and logged as `STATS_PARTIAL`) rather
//! than failing the request.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::observability::Logger;
use crate::table::{format_datetime, Column, Table, TypeKind, Value};

use super::errors::{EngineError, EngineResult};

/// Statistics report for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub column_name: String,
    /// Simplified type, or the native label for types without one
    pub data_type: String,
    pub total_rows: usize,
    pub non_null_count: usize,
    pub non_null_percentage: f64,
    pub null_count: usize,
    pub null_percentage: f64,
    /// Distinct non-null values
    pub unique_count: usize,
    pub unique_percentage: f64,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub details: Option<StatsDetails>,
}

/// Type-specific extension of [`ColumnStats`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatsDetails {
    Numeric(NumericStats),
    Text(TextStats),
    Temporal(TemporalStats),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NumericStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    /// Population standard deviation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlier_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlier_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlier_lower_bound: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlier_upper_bound: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_length: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TemporalStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range_days: Option<i64>,
}

/// Computes statistics for `column_name`.
///
/// # Errors
///
/// [`EngineError::ColumnNotFound`] if the table has no such column.
pub fn compute_stats(table: &Table, column_name: &str) -> EngineResult<ColumnStats> {
    let column = table
        .column(column_name)
        .ok_or_else(|| EngineError::ColumnNotFound(column_name.to_string()))?;

    let total_rows = column.len();
    let null_count = column.null_count();
    let non_null_count = total_rows - null_count;
    let unique_count = column
        .values()
        .iter()
        .filter_map(Value::to_text)
        .collect::<HashSet<_>>()
        .len();

    let (null_percentage, non_null_percentage, unique_percentage) = if total_rows == 0 {
        (0.0, 0.0, 0.0)
    } else {
        let null_pct = percent(null_count, total_rows);
        (null_pct, 100.0 - null_pct, percent(unique_count, total_rows))
    };

    let details = if non_null_count == 0 {
        None
    } else {
        match column.column_type().kind() {
            TypeKind::Integer | TypeKind::Float => {
                Some(StatsDetails::Numeric(numeric_stats(column, non_null_count)))
            }
            TypeKind::String => Some(StatsDetails::Text(text_stats(column))),
            TypeKind::Date | TypeKind::DateTime => {
                Some(StatsDetails::Temporal(temporal_stats(column)))
            }
            _ => None,
        }
    };

    Ok(ColumnStats {
        column_name: column_name.to_string(),
        data_type: column.column_type().simplified(),
        total_rows,
        non_null_count,
        non_null_percentage: round_to(non_null_percentage, 1),
        null_count,
        null_percentage: round_to(null_percentage, 1),
        unique_count,
        unique_percentage: round_to(unique_percentage, 1),
        details,
    })
}

fn numeric_stats(column: &Column, non_null_count: usize) -> NumericStats {
    let name = column.name();
    let mut values: Vec<f64> = column
        .values()
        .iter()
        .filter_map(Value::as_f64)
        .filter(|v| !v.is_nan())
        .collect();
    values.sort_by(f64::total_cmp);

    let min_value = best_effort(name, "min_value", values.first().copied());
    let max_value = best_effort(name, "max_value", values.last().copied());
    let mean = best_effort(name, "mean", mean_of(&values));
    let median = best_effort(name, "median", quantile(&values, 0.5));
    let std_dev = best_effort(name, "std_dev", population_std_dev(&values));

    let mut stats = NumericStats {
        min_value,
        max_value,
        mean: mean.map(|v| round_to(v, 2)),
        median: median.map(|v| round_to(v, 2)),
        std_dev: std_dev.map(|v| round_to(v, 2)),
        ..NumericStats::default()
    };

    let quartiles = quantile(&values, 0.25).zip(quantile(&values, 0.75));
    if let Some((q1, q3)) = best_effort(name, "outliers", quartiles) {
        let iqr = q3 - q1;
        let lower = q1 - 1.5 * iqr;
        let upper = q3 + 1.5 * iqr;
        let outliers = values.iter().filter(|&&v| v < lower || v > upper).count();

        stats.outlier_count = Some(outliers);
        stats.outlier_percentage = Some(round_to(percent(outliers, non_null_count), 1));
        stats.outlier_lower_bound = Some(round_to(lower, 2));
        stats.outlier_upper_bound = Some(round_to(upper, 2));
    }
    stats
}

fn text_stats(column: &Column) -> TextStats {
    let name = column.name();
    let strings: Vec<&str> = column
        .values()
        .iter()
        .filter_map(|v| match v {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        })
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &s in &strings {
        *counts.entry(s).or_insert(0) += 1;
    }
    // Highest count wins; ties go to the smallest value
    let mode = counts
        .into_iter()
        .min_by(|(va, ca), (vb, cb)| cb.cmp(ca).then_with(|| va.cmp(vb)));
    let mode = best_effort(name, "most_common_value", mode);

    let lengths: Vec<usize> = strings.iter().map(|s| s.chars().count()).collect();
    let avg_length = if lengths.is_empty() {
        None
    } else {
        Some(lengths.iter().sum::<usize>() as f64 / lengths.len() as f64)
    };

    TextStats {
        most_common_value: mode.map(|(v, _)| v.to_string()),
        most_common_count: mode.map(|(_, c)| c),
        min_length: best_effort(name, "min_length", lengths.iter().min().copied()),
        max_length: best_effort(name, "max_length", lengths.iter().max().copied()),
        avg_length: best_effort(name, "avg_length", avg_length).map(|v| round_to(v, 1)),
    }
}

fn temporal_stats(column: &Column) -> TemporalStats {
    let name = column.name();
    let utc = column.column_type().is_utc();
    let instants: Vec<NaiveDateTime> = column
        .values()
        .iter()
        .filter_map(|v| match v {
            Value::Date(d) => Some(d.and_time(chrono::NaiveTime::MIN)),
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        })
        .collect();

    let earliest = best_effort(name, "earliest_date", instants.iter().min().copied());
    let latest = best_effort(name, "latest_date", instants.iter().max().copied());
    let is_date = column.column_type().kind() == TypeKind::Date;
    let render = |dt: NaiveDateTime| {
        if is_date {
            dt.format("%Y-%m-%d").to_string()
        } else if utc {
            format!("{}+00:00", format_datetime(&dt, ' '))
        } else {
            format_datetime(&dt, ' ')
        }
    };

    TemporalStats {
        earliest_date: earliest.map(render),
        latest_date: latest.map(render),
        date_range_days: earliest
            .zip(latest)
            .map(|(lo, hi)| (hi - lo).num_days()),
    }
}

/// Passes `value` through, logging when a statistic had to be omitted
fn best_effort<T>(column: &str, stat: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        Logger::warn("STATS_PARTIAL", &[("column", column), ("stat", stat)]);
    }
    value
}

fn percent(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64 * 100.0
}

/// Rounds halves to even
fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

fn mean_of(sorted: &[f64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    Some(sorted.iter().sum::<f64>() / sorted.len() as f64)
}

fn population_std_dev(values: &[f64]) -> Option<f64> {
    let mean = mean_of(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Quantile with linear interpolation between closest ranks
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}
