//! Request and response bodies of the viewer endpoints
//!
//! Request bodies are loosely typed JSON; each field here is optional with a
//! documented default, and unknown fields are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::engine::{FilterSpec, SliceResult, SortDirection, SortSpec};
use crate::table::TableSchema;

use super::errors::{ApiError, ApiResult};

fn require<'a>(field: &'a Option<String>, name: &'static str) -> ApiResult<&'a str> {
    match field.as_deref() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::MissingParameter(name)),
    }
}

/// `{path}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataRequest {
    #[serde(default)]
    pub path: Option<String>,
}

impl MetadataRequest {
    pub fn path(&self) -> ApiResult<&str> {
        require(&self.path, "file path")
    }
}

/// One entry of the `filters` map
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    /// `text` (default) or `number`
    #[serde(rename = "type", default = "default_filter_type")]
    pub kind: String,
    /// Pattern or numeric bound; strings and numbers are accepted
    #[serde(default)]
    pub value: JsonValue,
    /// Numeric operator, default `=`
    #[serde(default)]
    pub operator: Option<String>,
    /// Overrides the request-level `caseInsensitive`
    #[serde(default)]
    pub case_insensitive: Option<bool>,
    /// Overrides the request-level `useRegex`
    #[serde(default)]
    pub regex: Option<bool>,
}

fn default_filter_type() -> String {
    "text".to_string()
}

impl FilterRequest {
    /// Compiles to a [`FilterSpec`], or `None` when the term is to be ignored:
    /// empty or non-scalar value, unknown type, unknown operator or an
    /// unparseable numeric bound.
    pub fn to_spec(&self, case_insensitive: bool, use_regex: bool) -> Option<FilterSpec> {
        let value = match &self.value {
            JsonValue::String(s) => s.clone(),
            JsonValue::Number(n) => n.to_string(),
            _ => return None,
        };
        if value.trim().is_empty() {
            return None;
        }

        match self.kind.as_str() {
            "text" => Some(FilterSpec::Text {
                pattern: value,
                case_insensitive: self.case_insensitive.unwrap_or(case_insensitive),
                regex: self.regex.unwrap_or(use_regex),
            }),
            "number" | "numeric" => {
                FilterSpec::numeric(self.operator.as_deref().unwrap_or("="), &value)
            }
            _ => None,
        }
    }
}

/// Paginated, filtered, sorted row request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRequest {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub offset: Option<usize>,
    /// Defaults to the server's `default_page_limit`
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub filters: BTreeMap<String, FilterRequest>,
    #[serde(default)]
    pub sort_by: Option<String>,
    /// `asc` (default); any other value sorts descending
    #[serde(default)]
    pub sort_order: Option<String>,
    /// `null` reads as false
    #[serde(default)]
    pub case_insensitive: Option<bool>,
    #[serde(default)]
    pub use_regex: Option<bool>,
}

impl DataRequest {
    pub fn path(&self) -> ApiResult<&str> {
        require(&self.path, "file path")
    }

    /// Active filter terms keyed by column
    pub fn filter_specs(&self) -> BTreeMap<String, FilterSpec> {
        self.filters
            .iter()
            .filter_map(|(column, filter)| {
                filter
                    .to_spec(
                        self.case_insensitive.unwrap_or(false),
                        self.use_regex.unwrap_or(false),
                    )
                    .map(|spec| (column.clone(), spec))
            })
            .collect()
    }

    pub fn sort_spec(&self) -> Option<SortSpec> {
        let column = self.sort_by.as_deref().filter(|c| !c.is_empty())?;
        let direction = SortDirection::from_order(self.sort_order.as_deref().unwrap_or("asc"));
        Some(SortSpec {
            column: column.to_string(),
            direction,
        })
    }
}

/// `{path, columnName}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRequest {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub column_name: Option<String>,
}

impl StatsRequest {
    pub fn path(&self) -> ApiResult<&str> {
        require(&self.path, "file path")
    }

    pub fn column_name(&self) -> ApiResult<&str> {
        require(&self.column_name, "column name")
    }
}

/// `{path, columnName, limit}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueValuesRequest {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub column_name: Option<String>,
    /// Zero or negative returns every value
    #[serde(default)]
    pub limit: Option<i64>,
}

impl UniqueValuesRequest {
    pub fn path(&self) -> ApiResult<&str> {
        require(&self.path, "file path")
    }

    pub fn column_name(&self) -> ApiResult<&str> {
        require(&self.column_name, "column name")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataResponse {
    pub columns: Vec<ColumnInfo>,
    pub total_rows: usize,
    pub file_size: u64,
}

impl MetadataResponse {
    pub fn new(schema: TableSchema, file_size: u64) -> Self {
        Self {
            columns: schema
                .columns
                .into_iter()
                .map(|c| ColumnInfo {
                    name: c.name,
                    type_label: c.type_label,
                })
                .collect(),
            total_rows: schema.row_count,
            file_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse {
    pub data: Vec<Map<String, JsonValue>>,
    pub offset: usize,
    pub limit: usize,
    /// Row count after filtering
    pub total_rows: usize,
    pub has_more: bool,
}

impl From<SliceResult> for DataResponse {
    fn from(result: SliceResult) -> Self {
        Self {
            data: result.rows,
            offset: result.offset,
            limit: result.limit,
            total_rows: result.total_rows,
            has_more: result.has_more,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniqueValuesResponse {
    pub values: Vec<String>,
    pub counts: Vec<usize>,
    pub limit: i64,
    /// Distinct values before truncation
    pub total_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CompareOp;
    use serde_json::json;

    fn data_request(body: JsonValue) -> DataRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_defaults() {
        let req = data_request(json!({"path": "a.csv"}));
        assert_eq!(req.offset, None);
        assert_eq!(req.limit, None);
        assert!(req.filters.is_empty());
        assert!(req.sort_spec().is_none());
        assert_eq!(req.use_regex, None);
    }

    #[test]
    fn test_missing_path() {
        assert!(matches!(
            data_request(json!({})).path(),
            Err(ApiError::MissingParameter("file path"))
        ));
        assert!(data_request(json!({"path": ""})).path().is_err());
    }

    #[test]
    fn test_filter_specs_use_request_flags() {
        let req = data_request(json!({
            "path": "a.csv",
            "caseInsensitive": true,
            "useRegex": true,
            "filters": {
                "name": {"type": "text", "value": "^a"},
                "age": {"type": "number", "operator": ">=", "value": "18"},
                "city": {"type": "text", "value": ""},
                "score": {"type": "number", "value": "abc"},
                "flag": {"type": "text", "value": "x", "regex": false}
            }
        }));

        let specs = req.filter_specs();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs["name"], FilterSpec::regex("^a", true));
        assert_eq!(
            specs["age"],
            FilterSpec::Numeric {
                op: CompareOp::Gte,
                value: 18.0
            }
        );
        assert_eq!(
            specs["flag"],
            FilterSpec::Text {
                pattern: "x".into(),
                case_insensitive: true,
                regex: false
            }
        );
    }

    #[test]
    fn test_blank_text_filter_is_dropped() {
        let req = data_request(json!({
            "path": "a.csv",
            "filters": {
                "name": {"type": "text", "value": "   "},
                "city": {"type": "text", "value": "\t"}
            }
        }));
        assert!(req.filter_specs().is_empty());
    }

    #[test]
    fn test_null_flags_read_as_false() {
        let req = data_request(json!({
            "path": "a.csv",
            "caseInsensitive": null,
            "useRegex": null,
            "filters": {"name": {"type": "text", "value": "Al"}}
        }));
        assert_eq!(req.filter_specs()["name"], FilterSpec::contains("Al"));
    }

    #[test]
    fn test_numeric_json_values_accepted() {
        let filter: FilterRequest =
            serde_json::from_value(json!({"type": "number", "value": 5, "operator": "<"})).unwrap();
        assert_eq!(
            filter.to_spec(false, false),
            Some(FilterSpec::Numeric {
                op: CompareOp::Lt,
                value: 5.0
            })
        );

        let unknown: FilterRequest =
            serde_json::from_value(json!({"type": "date", "value": "2024"})).unwrap();
        assert_eq!(unknown.to_spec(false, false), None);
    }

    #[test]
    fn test_sort_order() {
        let req = data_request(json!({"path": "a", "sortBy": "age", "sortOrder": "desc"}));
        assert_eq!(req.sort_spec(), Some(SortSpec::desc("age")));

        let req = data_request(json!({"path": "a", "sortBy": "age"}));
        assert_eq!(req.sort_spec(), Some(SortSpec::asc("age")));
    }

    #[test]
    fn test_stats_request_requires_column() {
        let req: StatsRequest = serde_json::from_value(json!({"path": "a.csv"})).unwrap();
        assert!(matches!(
            req.column_name(),
            Err(ApiError::MissingParameter("column name"))
        ));
    }

    #[test]
    fn test_metadata_response_shape() {
        let response = MetadataResponse {
            columns: vec![ColumnInfo {
                name: "id".into(),
                type_label: "int64".into(),
            }],
            total_rows: 3,
            file_size: 42,
        };
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({"columns": [{"name": "id", "type": "int64"}], "totalRows": 3, "fileSize": 42})
        );
    }
}
