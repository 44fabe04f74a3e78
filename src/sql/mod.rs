// Shared SQL generation for the three relational engines.
//
// The engines differ only in placeholder style, identifier quoting,
// RETURNING support, row-limit syntax, and DROP INDEX form; everything else
// about statement construction is common and lives in `builder`.

pub mod builder;
pub mod dialect;

pub use dialect::{Dialect, DropIndexStyle, LimitStyle, PlaceholderStyle, QuoteStyle};

use crate::error::StoreMiddlewareError;
use crate::types::{Record, Value};

/// A generated SQL string and its bound parameters, in binding order.
#[derive(Debug, Clone)]
pub struct QueryAndParams {
    /// The SQL query string
    pub query: String,
    /// The parameters to be bound to the query
    pub params: Vec<Value>,
}

impl QueryAndParams {
    /// Create a new `QueryAndParams` with the given query string and parameters
    pub fn new(query: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }

    /// Create a new `QueryAndParams` with no parameters
    pub fn new_without_params(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: Vec::new(),
        }
    }
}

/// Read the `count` column out of a COUNT(*) result set.
///
/// # Errors
/// Returns `ExecutionError` if the result set is empty or the value is not a
/// non-negative integer.
pub fn count_from_rows(rows: &[Record]) -> Result<u64, StoreMiddlewareError> {
    let value = rows
        .first()
        .and_then(|row| row.get("count"))
        .and_then(Value::as_int)
        .ok_or_else(|| {
            StoreMiddlewareError::ExecutionError("count query returned no rows".to_string())
        })?;
    u64::try_from(*value)
        .map_err(|e| StoreMiddlewareError::ExecutionError(format!("invalid count value: {e}")))
}
