//! Predicate filtering
//!
//! Each [`FilterSpec`] compiles to a predicate over one column; compiled
//! predicates are AND-combined. Filters on unknown columns, blank patterns
//! and invalid regexes never fail a request.

use regex::{Regex, RegexBuilder};

use crate::table::{Table, TypeKind, Value};

/// Filtering semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterProfile {
    /// Multi-format behaviour: text filters cast every column to text,
    /// substitute `(null)` for nulls, and honour regex/case-insensitivity.
    #[default]
    Tabular,
    /// Parquet-only behaviour: case-sensitive raw substring match against
    /// genuinely string-typed columns only.
    Basic,
}

/// Numeric comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl CompareOp {
    /// Parses `=`, `>`, `<`, `>=`, `<=`
    pub fn parse(op: &str) -> Option<Self> {
        match op.trim() {
            "=" | "==" => Some(CompareOp::Eq),
            ">" => Some(CompareOp::Gt),
            "<" => Some(CompareOp::Lt),
            ">=" => Some(CompareOp::Gte),
            "<=" => Some(CompareOp::Lte),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Gte => ">=",
            CompareOp::Lte => "<=",
        }
    }

    fn holds(&self, actual: f64, bound: f64) -> bool {
        match self {
            CompareOp::Eq => actual == bound,
            CompareOp::Gt => actual > bound,
            CompareOp::Lt => actual < bound,
            CompareOp::Gte => actual >= bound,
            CompareOp::Lte => actual <= bound,
        }
    }
}

/// A single column-scoped predicate description
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    Text {
        pattern: String,
        case_insensitive: bool,
        regex: bool,
    },
    Numeric {
        op: CompareOp,
        value: f64,
    },
}

impl FilterSpec {
    /// Plain case-sensitive substring filter
    pub fn contains(pattern: impl Into<String>) -> Self {
        FilterSpec::Text {
            pattern: pattern.into(),
            case_insensitive: false,
            regex: false,
        }
    }

    /// Regex filter
    pub fn regex(pattern: impl Into<String>, case_insensitive: bool) -> Self {
        FilterSpec::Text {
            pattern: pattern.into(),
            case_insensitive,
            regex: true,
        }
    }

    /// Numeric filter from raw operator and value text.
    ///
    /// Returns `None` (filter skipped) when either does not parse.
    pub fn numeric(op: &str, value: &str) -> Option<Self> {
        let op = CompareOp::parse(op)?;
        let value = value.trim().parse::<f64>().ok()?;
        Some(FilterSpec::Numeric { op, value })
    }
}

#[derive(Debug)]
enum TextMatcher {
    Substring { needle: String, case_insensitive: bool },
    Pattern(Regex),
}

impl TextMatcher {
    fn build(pattern: &str, case_insensitive: bool, regex: bool) -> Self {
        if regex {
            // invalid patterns degrade to substring matching
            if let Ok(compiled) = RegexBuilder::new(pattern)
                .case_insensitive(case_insensitive)
                .build()
            {
                return TextMatcher::Pattern(compiled);
            }
        }
        let needle = if case_insensitive {
            pattern.to_lowercase()
        } else {
            pattern.to_string()
        };
        TextMatcher::Substring {
            needle,
            case_insensitive,
        }
    }

    fn is_match(&self, text: &str) -> bool {
        match self {
            TextMatcher::Substring {
                needle,
                case_insensitive: true,
            } => text.to_lowercase().contains(needle.as_str()),
            TextMatcher::Substring { needle, .. } => text.contains(needle.as_str()),
            TextMatcher::Pattern(regex) => regex.is_match(text),
        }
    }
}

#[derive(Debug)]
enum Predicate {
    /// Tabular text match over the cast-to-text view
    Text(TextMatcher),
    /// Basic raw substring match over string cells
    RawSubstring(String),
    Numeric { op: CompareOp, bound: f64 },
    /// Basic text filter on a non-string column
    Never,
}

#[derive(Debug)]
struct ColumnFilter {
    column: usize,
    predicate: Predicate,
}

impl ColumnFilter {
    fn matches(&self, value: &Value) -> bool {
        match &self.predicate {
            Predicate::Text(matcher) => matcher.is_match(&value.to_text_or_null_label()),
            Predicate::RawSubstring(needle) => match value {
                Value::Str(s) => s.contains(needle.as_str()),
                _ => false,
            },
            Predicate::Numeric { op, bound } => {
                value.as_f64().map(|v| op.holds(v, *bound)).unwrap_or(false)
            }
            Predicate::Never => false,
        }
    }
}

/// Compiled, AND-combined set of column predicates
#[derive(Debug, Default)]
pub struct PredicateFilter {
    filters: Vec<ColumnFilter>,
}

impl PredicateFilter {
    /// Compiles filter specs against a table.
    ///
    /// Unknown columns and blank text patterns are dropped silently.
    pub fn compile<'a, I>(table: &Table, specs: I, profile: FilterProfile) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a FilterSpec)>,
    {
        let mut filters = Vec::new();

        for (name, spec) in specs {
            let Some(column) = table.column_index(name) else {
                continue;
            };

            let predicate = match spec {
                FilterSpec::Text { pattern, .. } if pattern.trim().is_empty() => continue,
                FilterSpec::Text {
                    pattern,
                    case_insensitive,
                    regex,
                } => match profile {
                    FilterProfile::Tabular => {
                        Predicate::Text(TextMatcher::build(pattern, *case_insensitive, *regex))
                    }
                    FilterProfile::Basic => {
                        if table.columns()[column].column_type().kind() == TypeKind::String {
                            Predicate::RawSubstring(pattern.clone())
                        } else {
                            Predicate::Never
                        }
                    }
                },
                FilterSpec::Numeric { op, value } => Predicate::Numeric {
                    op: *op,
                    bound: *value,
                },
            };

            filters.push(ColumnFilter { column, predicate });
        }

        Self { filters }
    }

    /// Number of active predicates
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Checks a single row against every predicate
    pub fn matches(&self, table: &Table, row: usize) -> bool {
        self.filters
            .iter()
            .all(|f| f.matches(table.columns()[f.column].value(row)))
    }

    /// Row positions (in table order) that pass every predicate
    pub fn apply(&self, table: &Table) -> Vec<usize> {
        (0..table.row_count())
            .filter(|&row| self.matches(table, row))
            .collect()
    }
}
