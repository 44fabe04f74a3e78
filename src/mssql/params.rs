use std::borrow::Cow;
use std::fmt;

use tiberius::{ColumnData, IntoSql};

use crate::types::Value;

/// Owned parameter wrapper for SQL Server.
///
/// Owning the data (rather than borrowing from the middleware value) lets
/// timestamps and JSON be rendered to text once at conversion time.
pub enum SqlParam {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Binary(Vec<u8>),
    Null,
}

impl fmt::Debug for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlParam::Int(i) => write!(f, "SqlParam::Int({i})"),
            SqlParam::Float(fl) => write!(f, "SqlParam::Float({fl})"),
            SqlParam::Text(s) => write!(f, "SqlParam::Text({s})"),
            SqlParam::Bool(b) => write!(f, "SqlParam::Bool({b})"),
            SqlParam::Binary(_) => write!(f, "SqlParam::Binary(...)"),
            SqlParam::Null => write!(f, "SqlParam::Null"),
        }
    }
}

impl<'a> IntoSql<'a> for SqlParam {
    fn into_sql(self) -> ColumnData<'a> {
        match self {
            SqlParam::Int(i) => ColumnData::I64(Some(i)),
            SqlParam::Float(f) => ColumnData::F64(Some(f)),
            SqlParam::Text(s) => ColumnData::String(Some(Cow::Owned(s))),
            SqlParam::Bool(b) => ColumnData::Bit(Some(b)),
            SqlParam::Binary(b) => ColumnData::Binary(Some(Cow::Owned(b))),
            SqlParam::Null => ColumnData::String(None),
        }
    }
}

/// Convert a middleware [`Value`] to a bindable [`SqlParam`].
#[must_use]
pub fn to_sql_param(value: &Value) -> SqlParam {
    match value {
        Value::Int(i) => SqlParam::Int(*i),
        Value::Float(f) => SqlParam::Float(*f),
        Value::Text(s) => SqlParam::Text(s.clone()),
        Value::Bool(b) => SqlParam::Bool(*b),
        // Timestamps travel as ISO-8601 text; T-SQL converts implicitly
        Value::Timestamp(dt) => SqlParam::Text(dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string()),
        Value::Null => SqlParam::Null,
        Value::Json(jsval) => SqlParam::Text(jsval.to_string()),
        Value::Blob(bytes) => SqlParam::Binary(bytes.clone()),
    }
}

/// Convert a parameter slice for binding in `@P1`, `@P2`, ... order.
#[must_use]
pub fn convert(params: &[Value]) -> Vec<SqlParam> {
    params.iter().map(to_sql_param).collect()
}
