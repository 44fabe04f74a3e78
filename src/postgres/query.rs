use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::error::StoreMiddlewareError;
use crate::types::{Record, Value};

/// Extracts a [`Value`] from a `tokio_postgres` Row at the given index.
///
/// # Errors
/// Returns `PostgresError` if the column cannot be retrieved.
pub fn extract_value(
    row: &tokio_postgres::Row,
    idx: usize,
) -> Result<Value, StoreMiddlewareError> {
    // Match on the column's type name; unknown types fall back to text.
    let type_info = row.columns()[idx].type_();

    if type_info.name() == "int2" {
        let val: Option<i16> = row.try_get(idx)?;
        Ok(val.map_or(Value::Null, |v| Value::Int(i64::from(v))))
    } else if type_info.name() == "int4" {
        let val: Option<i32> = row.try_get(idx)?;
        Ok(val.map_or(Value::Null, |v| Value::Int(i64::from(v))))
    } else if type_info.name() == "int8" {
        let val: Option<i64> = row.try_get(idx)?;
        Ok(val.map_or(Value::Null, Value::Int))
    } else if type_info.name() == "float4" || type_info.name() == "float8" {
        let val: Option<f64> = row.try_get(idx)?;
        Ok(val.map_or(Value::Null, Value::Float))
    } else if type_info.name() == "bool" {
        let val: Option<bool> = row.try_get(idx)?;
        Ok(val.map_or(Value::Null, Value::Bool))
    } else if type_info.name() == "timestamp" || type_info.name() == "timestamptz" {
        let val: Option<NaiveDateTime> = row.try_get(idx)?;
        Ok(val.map_or(Value::Null, Value::Timestamp))
    } else if type_info.name() == "json" || type_info.name() == "jsonb" {
        let val: Option<JsonValue> = row.try_get(idx)?;
        Ok(val.map_or(Value::Null, Value::Json))
    } else if type_info.name() == "bytea" {
        let val: Option<Vec<u8>> = row.try_get(idx)?;
        Ok(val.map_or(Value::Null, Value::Blob))
    } else {
        let val: Option<String> = row.try_get(idx)?;
        Ok(val.map_or(Value::Null, Value::Text))
    }
}

/// Build ordered [`Record`]s from raw Postgres rows.
///
/// # Errors
/// Returns errors from row value extraction.
pub fn records_from_rows(
    rows: &[tokio_postgres::Row],
) -> Result<Vec<Record>, StoreMiddlewareError> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let mut record = Record::new();
        for (idx, column) in row.columns().iter().enumerate() {
            record.set(column.name(), extract_value(row, idx)?);
        }
        records.push(record);
    }
    Ok(records)
}
