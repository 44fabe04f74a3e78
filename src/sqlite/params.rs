use crate::types::Value;

/// Convert a single middleware [`Value`] to a rusqlite value.
///
/// Booleans become 0/1 integers, timestamps and JSON become text; this
/// mirrors what `SQLite` itself stores for those types.
#[must_use]
pub fn to_sqlite_value(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Int(i) => rusqlite::types::Value::Integer(*i),
        Value::Float(f) => rusqlite::types::Value::Real(*f),
        Value::Text(s) => rusqlite::types::Value::Text(s.clone()),
        Value::Bool(b) => rusqlite::types::Value::Integer(i64::from(*b)),
        Value::Timestamp(dt) => {
            rusqlite::types::Value::Text(dt.format("%F %T%.f").to_string())
        }
        Value::Null => rusqlite::types::Value::Null,
        Value::Json(jval) => rusqlite::types::Value::Text(jval.to_string()),
        Value::Blob(bytes) => rusqlite::types::Value::Blob(bytes.clone()),
    }
}

/// Convert a parameter slice for binding with `rusqlite::params_from_iter`.
#[must_use]
pub fn convert(params: &[Value]) -> Vec<rusqlite::types::Value> {
    params.iter().map(to_sqlite_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_binds_as_integer() {
        assert_eq!(
            to_sqlite_value(&Value::Bool(true)),
            rusqlite::types::Value::Integer(1)
        );
    }

    #[test]
    fn json_binds_as_text() {
        let v = Value::Json(serde_json::json!({"a": 1}));
        assert_eq!(
            to_sqlite_value(&v),
            rusqlite::types::Value::Text(r#"{"a":1}"#.to_string())
        );
    }
}
