//! Wire serialization of cells and rows

use serde_json::{Map, Number, Value as JsonValue};

use crate::table::{decimal_to_f64, format_datetime, ColumnType, Table, Value, ORIGINAL_ROW_INDEX};

use super::filters::FilterProfile;

/// Key under which a row object reports its 1-based source position
pub const ROW_INDEX: &str = "__row_index__";

/// Converts one cell into its wire representation.
///
/// Dates and timestamps become ISO-8601 strings (timezone-aware columns carry
/// `+00:00`), decimals become floats, and binary is decoded lossily. Nested
/// values are JSON-encoded into a string under the tabular profile and kept
/// as native JSON under the basic one. Non-finite floats have no JSON form
/// and are emitted as null.
pub fn serialize_value(value: &Value, column_type: &ColumnType, profile: FilterProfile) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Int(v) => JsonValue::from(*v),
        Value::Float(v) => float_json(*v),
        Value::Str(s) => JsonValue::String(s.clone()),
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Date(d) => JsonValue::String(d.format("%Y-%m-%d").to_string()),
        Value::DateTime(dt) => {
            let mut text = format_datetime(dt, 'T');
            if column_type.is_utc() {
                text.push_str("+00:00");
            }
            JsonValue::String(text)
        }
        Value::Decimal { mantissa, scale } => float_json(decimal_to_f64(*mantissa, *scale)),
        Value::Binary(bytes) => JsonValue::String(String::from_utf8_lossy(bytes).into_owned()),
        Value::Nested(json) => match profile {
            FilterProfile::Tabular => JsonValue::String(json.to_string()),
            FilterProfile::Basic => json.clone(),
        },
        Value::Other(s) => JsonValue::String(s.clone()),
    }
}

fn float_json(v: f64) -> JsonValue {
    Number::from_f64(v).map_or(JsonValue::Null, JsonValue::Number)
}

/// Builds the JSON object for one table row.
///
/// Under the tabular profile the synthetic original-row-index column is
/// pulled out of the payload and reported as [`ROW_INDEX`], always as the
/// last key (null when the table carries no index column).
pub fn row_object(table: &Table, row: usize, profile: FilterProfile) -> Map<String, JsonValue> {
    let mut object = Map::with_capacity(table.columns().len() + 1);
    let mut original_index = JsonValue::Null;

    for column in table.columns() {
        let value = serialize_value(column.value(row), column.column_type(), profile);
        if profile == FilterProfile::Tabular && column.name() == ORIGINAL_ROW_INDEX {
            original_index = value;
        } else {
            object.insert(column.name().to_string(), value);
        }
    }

    if profile == FilterProfile::Tabular {
        object.insert(ROW_INDEX.to_string(), original_index);
    }
    object
}
