use rusqlite::types::ValueRef;

use crate::error::StoreMiddlewareError;
use crate::types::Value;

/// Extract a middleware [`Value`] from a rusqlite row at the given index.
///
/// Text comes back as `Value::Text`; callers that stored timestamps or JSON
/// recover them through `Value::as_timestamp` / their own parsing, matching
/// `SQLite`'s dynamic typing.
///
/// # Errors
/// Returns `SqliteError` if the column cannot be read.
pub fn extract_value(row: &rusqlite::Row<'_>, idx: usize) -> Result<Value, StoreMiddlewareError> {
    let value = match row.get_ref(idx)? {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    };
    Ok(value)
}
