//! Parquet reader built on the Arrow integration of the `parquet` crate.

use std::fs::File;
use std::path::Path;

use arrow_array::cast::AsArray;
use arrow_array::types::*;
use arrow_array::Array;
use arrow_schema::{DataType, TimeUnit};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Number, Value as JsonValue};

use super::column::{Column, ColumnSchema, ColumnType, Table, TableSchema, TypeKind};
use super::errors::{TableError, TableResult};
use super::value::{format_datetime, format_decimal, Value};

const FORMAT: &str = "Parquet";

/// Reads every row group of a Parquet file into a table
pub fn read_parquet(path: &Path) -> TableResult<Table> {
    let file = File::open(path)?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| TableError::read(FORMAT, e))?;

    let mut columns: Vec<Column> = builder
        .schema()
        .fields()
        .iter()
        .map(|field| Column::new(field.name(), column_type(field.data_type()), Vec::new()))
        .collect();

    let reader = builder.build().map_err(|e| TableError::read(FORMAT, e))?;
    for batch in reader {
        let batch = batch.map_err(|e| TableError::read(FORMAT, e))?;
        for (column, array) in columns.iter_mut().zip(batch.columns()) {
            append_values(column.values_mut(), array.as_ref())?;
        }
    }

    Table::new(columns)
}

/// Reads only the footer: schema and row count
pub fn describe_parquet(path: &Path) -> TableResult<TableSchema> {
    let file = File::open(path)?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| TableError::read(FORMAT, e))?;

    let columns = builder
        .schema()
        .fields()
        .iter()
        .map(|field| ColumnSchema {
            name: field.name().clone(),
            type_label: type_label(field.data_type()),
        })
        .collect();
    let row_count = builder.metadata().file_metadata().num_rows();

    Ok(TableSchema {
        columns,
        row_count: usize::try_from(row_count).map_err(|e| TableError::read(FORMAT, e))?,
    })
}

/// Maps an Arrow type onto a semantic column type
pub(crate) fn column_type(data_type: &DataType) -> ColumnType {
    let label = type_label(data_type);
    match data_type {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => ColumnType::new(TypeKind::Integer, label),
        DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            ColumnType::new(TypeKind::Float, label)
        }
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            ColumnType::new(TypeKind::String, label)
        }
        DataType::Boolean => ColumnType::new(TypeKind::Boolean, label),
        DataType::Date32 | DataType::Date64 => ColumnType::new(TypeKind::Date, label),
        DataType::Timestamp(_, tz) => {
            let column_type = ColumnType::new(TypeKind::DateTime, label);
            if tz.is_some() {
                column_type.with_utc()
            } else {
                column_type
            }
        }
        DataType::Decimal128(_, _) | DataType::Decimal256(_, _) => {
            ColumnType::new(TypeKind::Decimal, label)
        }
        DataType::Binary
        | DataType::LargeBinary
        | DataType::BinaryView
        | DataType::FixedSizeBinary(_) => ColumnType::new(TypeKind::Binary, label),
        DataType::Dictionary(_, value_type) => {
            let inner = column_type(value_type);
            ColumnType::new(inner.kind(), label)
        }
        _ => ColumnType::new(TypeKind::Other, label),
    }
}

/// Native type label in Arrow's conventional spelling
pub(crate) fn type_label(data_type: &DataType) -> String {
    match data_type {
        DataType::Null => "null".to_string(),
        DataType::Boolean => "bool".to_string(),
        DataType::Int8 => "int8".to_string(),
        DataType::Int16 => "int16".to_string(),
        DataType::Int32 => "int32".to_string(),
        DataType::Int64 => "int64".to_string(),
        DataType::UInt8 => "uint8".to_string(),
        DataType::UInt16 => "uint16".to_string(),
        DataType::UInt32 => "uint32".to_string(),
        DataType::UInt64 => "uint64".to_string(),
        DataType::Float16 => "halffloat".to_string(),
        DataType::Float32 => "float".to_string(),
        DataType::Float64 => "double".to_string(),
        DataType::Utf8 => "string".to_string(),
        DataType::LargeUtf8 => "large_string".to_string(),
        DataType::Utf8View => "string_view".to_string(),
        DataType::Binary => "binary".to_string(),
        DataType::LargeBinary => "large_binary".to_string(),
        DataType::BinaryView => "binary_view".to_string(),
        DataType::FixedSizeBinary(n) => format!("fixed_size_binary[{}]", n),
        DataType::Date32 => "date32[day]".to_string(),
        DataType::Date64 => "date64[ms]".to_string(),
        DataType::Time32(unit) => format!("time32[{}]", unit_label(unit)),
        DataType::Time64(unit) => format!("time64[{}]", unit_label(unit)),
        DataType::Duration(unit) => format!("duration[{}]", unit_label(unit)),
        DataType::Timestamp(unit, None) => format!("timestamp[{}]", unit_label(unit)),
        DataType::Timestamp(unit, Some(tz)) => {
            format!("timestamp[{}, tz={}]", unit_label(unit), tz)
        }
        DataType::Decimal128(p, s) => format!("decimal128({}, {})", p, s),
        DataType::Decimal256(p, s) => format!("decimal256({}, {})", p, s),
        DataType::List(field) => format!("list<item: {}>", type_label(field.data_type())),
        DataType::LargeList(field) => {
            format!("large_list<item: {}>", type_label(field.data_type()))
        }
        DataType::FixedSizeList(field, n) => {
            format!("fixed_size_list<item: {}>[{}]", type_label(field.data_type()), n)
        }
        DataType::Struct(fields) => {
            let inner: Vec<String> = fields
                .iter()
                .map(|f| format!("{}: {}", f.name(), type_label(f.data_type())))
                .collect();
            format!("struct<{}>", inner.join(", "))
        }
        DataType::Map(entries, _) => match entries.data_type() {
            DataType::Struct(kv) if kv.len() == 2 => format!(
                "map<{}, {}>",
                type_label(kv[0].data_type()),
                type_label(kv[1].data_type())
            ),
            other => format!("map<{}>", type_label(other)),
        },
        DataType::Dictionary(key, value) => format!(
            "dictionary<values={}, indices={}, ordered=0>",
            type_label(value),
            type_label(key)
        ),
        other => other.to_string().to_lowercase(),
    }
}

fn unit_label(unit: &TimeUnit) -> &'static str {
    match unit {
        TimeUnit::Second => "s",
        TimeUnit::Millisecond => "ms",
        TimeUnit::Microsecond => "us",
        TimeUnit::Nanosecond => "ns",
    }
}

fn append_values(out: &mut Vec<Value>, array: &dyn Array) -> TableResult<()> {
    out.reserve(array.len());

    // Resolve dictionary keys once per batch instead of per cell
    if let Some(dictionary) = array.as_any_dictionary_opt() {
        let keys = dictionary.normalized_keys();
        let values = dictionary.values();
        for (row, key) in keys.into_iter().enumerate() {
            if array.is_null(row) {
                out.push(Value::Null);
            } else {
                out.push(cell_value(values.as_ref(), key)?);
            }
        }
        return Ok(());
    }

    for row in 0..array.len() {
        out.push(cell_value(array, row)?);
    }
    Ok(())
}

fn missing(what: &str) -> TableError {
    TableError::read(FORMAT, format!("{} value out of range", what))
}

/// Converts one Arrow cell
fn cell_value(array: &dyn Array, row: usize) -> TableResult<Value> {
    if array.is_null(row) {
        return Ok(Value::Null);
    }

    let value = match array.data_type() {
        DataType::Null => Value::Null,
        DataType::Int8 => Value::Int(array.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => Value::Int(array.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => Value::Int(array.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => Value::Int(array.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => Value::Int(array.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => Value::Int(array.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => Value::Int(array.as_primitive::<UInt32Type>().value(row).into()),
        DataType::UInt64 => {
            let v = array.as_primitive::<UInt64Type>().value(row);
            Value::Int(i64::try_from(v).map_err(|e| TableError::read(FORMAT, e))?)
        }
        DataType::Float16 => Value::Float(array.as_primitive::<Float16Type>().value(row).to_f64()),
        DataType::Float32 => Value::Float(array.as_primitive::<Float32Type>().value(row).into()),
        DataType::Float64 => Value::Float(array.as_primitive::<Float64Type>().value(row)),
        DataType::Utf8 => Value::Str(array.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::Str(array.as_string::<i64>().value(row).to_string()),
        DataType::Utf8View => Value::Str(array.as_string_view().value(row).to_string()),
        DataType::Boolean => Value::Bool(array.as_boolean().value(row)),
        DataType::Date32 => Value::Date(
            array
                .as_primitive::<Date32Type>()
                .value_as_date(row)
                .ok_or_else(|| missing("date32"))?,
        ),
        DataType::Date64 => Value::Date(
            array
                .as_primitive::<Date64Type>()
                .value_as_date(row)
                .ok_or_else(|| missing("date64"))?,
        ),
        DataType::Timestamp(unit, _) => {
            let datetime = match unit {
                TimeUnit::Second => array
                    .as_primitive::<TimestampSecondType>()
                    .value_as_datetime(row),
                TimeUnit::Millisecond => array
                    .as_primitive::<TimestampMillisecondType>()
                    .value_as_datetime(row),
                TimeUnit::Microsecond => array
                    .as_primitive::<TimestampMicrosecondType>()
                    .value_as_datetime(row),
                TimeUnit::Nanosecond => array
                    .as_primitive::<TimestampNanosecondType>()
                    .value_as_datetime(row),
            };
            Value::DateTime(datetime.ok_or_else(|| missing("timestamp"))?)
        }
        DataType::Time32(unit) => {
            let time = match unit {
                TimeUnit::Second => array.as_primitive::<Time32SecondType>().value_as_time(row),
                _ => array
                    .as_primitive::<Time32MillisecondType>()
                    .value_as_time(row),
            };
            Value::Other(time.ok_or_else(|| missing("time32"))?.to_string())
        }
        DataType::Time64(unit) => {
            let time = match unit {
                TimeUnit::Nanosecond => array
                    .as_primitive::<Time64NanosecondType>()
                    .value_as_time(row),
                _ => array
                    .as_primitive::<Time64MicrosecondType>()
                    .value_as_time(row),
            };
            Value::Other(time.ok_or_else(|| missing("time64"))?.to_string())
        }
        DataType::Decimal128(_, scale) => Value::Decimal {
            mantissa: array.as_primitive::<Decimal128Type>().value(row),
            scale: *scale,
        },
        DataType::Decimal256(_, scale) => {
            let raw = array.as_primitive::<Decimal256Type>().value(row);
            match raw.to_i128() {
                Some(mantissa) => Value::Decimal {
                    mantissa,
                    scale: *scale,
                },
                None => Value::Other(raw.to_string()),
            }
        }
        DataType::Binary => Value::Binary(array.as_binary::<i32>().value(row).to_vec()),
        DataType::LargeBinary => Value::Binary(array.as_binary::<i64>().value(row).to_vec()),
        DataType::BinaryView => Value::Binary(array.as_binary_view().value(row).to_vec()),
        DataType::FixedSizeBinary(_) => {
            Value::Binary(array.as_fixed_size_binary().value(row).to_vec())
        }
        DataType::List(_)
        | DataType::LargeList(_)
        | DataType::FixedSizeList(_, _)
        | DataType::Struct(_)
        | DataType::Map(_, _) => Value::Nested(nested_json(array, row)?),
        DataType::Dictionary(_, _) => {
            let dictionary = array.as_any_dictionary();
            let key = dictionary.normalized_keys()[row];
            cell_value(dictionary.values().as_ref(), key)?
        }
        other => Value::Other(format!("<{}>", type_label(other))),
    };
    Ok(value)
}

/// Renders a nested cell (and everything beneath it) as JSON
fn nested_json(array: &dyn Array, row: usize) -> TableResult<JsonValue> {
    if array.is_null(row) {
        return Ok(JsonValue::Null);
    }

    match array.data_type() {
        DataType::List(_) => json_list(array.as_list::<i32>().value(row).as_ref()),
        DataType::LargeList(_) => json_list(array.as_list::<i64>().value(row).as_ref()),
        DataType::FixedSizeList(_, _) => {
            json_list(array.as_fixed_size_list().value(row).as_ref())
        }
        DataType::Struct(fields) => {
            let columns = array.as_struct().columns();
            let mut object = Map::with_capacity(fields.len());
            for (field, child) in fields.iter().zip(columns) {
                object.insert(field.name().clone(), nested_json(child.as_ref(), row)?);
            }
            Ok(JsonValue::Object(object))
        }
        DataType::Map(_, _) => {
            let entries = array.as_map().value(row);
            let (keys, values) = (entries.column(0), entries.column(1));
            let pairs = (0..entries.len())
                .map(|i| {
                    Ok(JsonValue::Array(vec![
                        nested_json(keys.as_ref(), i)?,
                        nested_json(values.as_ref(), i)?,
                    ]))
                })
                .collect::<TableResult<Vec<_>>>()?;
            Ok(JsonValue::Array(pairs))
        }
        _ => Ok(scalar_json(cell_value(array, row)?)),
    }
}

fn json_list(items: &dyn Array) -> TableResult<JsonValue> {
    (0..items.len())
        .map(|i| nested_json(items, i))
        .collect::<TableResult<Vec<_>>>()
        .map(JsonValue::Array)
}

fn scalar_json(value: Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Int(v) => JsonValue::from(v),
        Value::Float(v) => Number::from_f64(v).map(JsonValue::Number).unwrap_or(JsonValue::Null),
        Value::Str(s) | Value::Other(s) => JsonValue::String(s),
        Value::Bool(b) => JsonValue::Bool(b),
        Value::Date(d) => JsonValue::String(d.format("%Y-%m-%d").to_string()),
        Value::DateTime(dt) => JsonValue::String(format_datetime(&dt, 'T')),
        Value::Decimal { mantissa, scale } => JsonValue::String(format_decimal(mantissa, scale)),
        Value::Binary(bytes) => JsonValue::String(String::from_utf8_lossy(&bytes).into_owned()),
        Value::Nested(json) => json,
    }
}
