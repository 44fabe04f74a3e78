use chrono::NaiveDateTime;
use futures_util::TryStreamExt;
use tiberius::Row;

use crate::error::StoreMiddlewareError;
use crate::mssql::params;
use crate::mssql::pool::MssqlClient;
use crate::types::{Record, Value};

/// Run a statement that produces rows and collect them as [`Record`]s.
///
/// Parameters bind in slice order to `@P1`, `@P2`, ... A statement batch is
/// allowed; rows from every result set in the batch are collected.
pub async fn build_result_set(
    client: &mut MssqlClient,
    sql: &str,
    values: &[Value],
) -> Result<Vec<Record>, StoreMiddlewareError> {
    let mut query = tiberius::Query::new(sql.to_string());
    for param in params::convert(values) {
        query.bind(param);
    }

    let stream = query.query(client).await?;
    let mut rows = stream.into_row_stream();

    let mut records = Vec::new();
    while let Some(row) = rows.try_next().await? {
        records.push(record_from_row(&row));
    }
    Ok(records)
}

/// Run a statement that returns no rows; report the affected row count.
pub async fn execute(
    client: &mut MssqlClient,
    sql: &str,
    values: &[Value],
) -> Result<u64, StoreMiddlewareError> {
    let mut query = tiberius::Query::new(sql.to_string());
    for param in params::convert(values) {
        query.bind(param);
    }

    let result = query.execute(client).await?;
    Ok(result.rows_affected().iter().sum())
}

fn record_from_row(row: &Row) -> Record {
    let names: Vec<String> = row
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();

    let mut record = Record::new();
    for (idx, name) in names.iter().enumerate() {
        record.set(name, extract_value(row, idx));
    }
    record
}

/// Pull a single column out of a Tiberius row, trying the wire types the
/// builders can produce. Anything unrecognised comes back as Null.
fn extract_value(row: &Row, idx: usize) -> Value {
    if let Ok(Some(val)) = row.try_get::<i64, _>(idx) {
        return Value::Int(val);
    }
    if let Ok(Some(val)) = row.try_get::<i32, _>(idx) {
        return Value::Int(i64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<f64, _>(idx) {
        return Value::Float(val);
    }
    if let Ok(Some(val)) = row.try_get::<f32, _>(idx) {
        return Value::Float(f64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<bool, _>(idx) {
        return Value::Bool(val);
    }
    if let Ok(Some(val)) = row.try_get::<NaiveDateTime, _>(idx) {
        return Value::Timestamp(val);
    }
    if let Ok(Some(val)) = row.try_get::<&str, _>(idx) {
        return Value::Text(val.to_string());
    }
    if let Ok(Some(val)) = row.try_get::<&[u8], _>(idx) {
        return Value::Blob(val.to_vec());
    }
    Value::Null
}
