use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::adapter::StoreAdapter;
use crate::error::StoreMiddlewareError;
use crate::sql::{Dialect, QueryAndParams, builder, count_from_rows};
use crate::sqlite::config::SqliteConfig;
use crate::sqlite::{params, query};
use crate::types::{FindOptions, IndexOptions, Record, Schema, Selector, Value};

pub(crate) type SharedConnection = Arc<Mutex<rusqlite::Connection>>;

/// Embedded `SQLite` adapter.
///
/// One shared handle, no pool. The transaction "slot" is a boolean guard on
/// that handle: `BEGIN`/`COMMIT`/`ROLLBACK` run as plain statements and the
/// flag enforces the single-transaction invariant before any engine I/O.
pub struct SqliteAdapter {
    config: SqliteConfig,
    conn: Option<SharedConnection>,
    in_transaction: bool,
}

impl SqliteAdapter {
    /// Construct a Disconnected adapter from its config.
    #[must_use]
    pub fn new(config: SqliteConfig) -> Self {
        Self {
            config,
            conn: None,
            in_transaction: false,
        }
    }

    fn handle(&self) -> Result<SharedConnection, StoreMiddlewareError> {
        self.conn
            .clone()
            .ok_or_else(|| StoreMiddlewareError::not_connected("sqlite"))
    }

    async fn run_select(&self, qp: QueryAndParams) -> Result<Vec<Record>, StoreMiddlewareError> {
        let handle = self.handle()?;
        debug!(sql = %qp.query, "sqlite select");
        run_blocking(handle, move |conn| {
            let mut stmt = conn.prepare(&qp.query)?;
            let column_names: Vec<String> = stmt
                .column_names()
                .iter()
                .map(|name| (*name).to_string())
                .collect();
            let values = params::convert(&qp.params);
            let mut rows = stmt.query(rusqlite::params_from_iter(values))?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                let mut record = Record::new();
                for (idx, name) in column_names.iter().enumerate() {
                    record.set(name.clone(), query::extract_value(row, idx)?);
                }
                records.push(record);
            }
            Ok(records)
        })
        .await
    }

    async fn run_execute(&self, qp: QueryAndParams) -> Result<u64, StoreMiddlewareError> {
        let handle = self.handle()?;
        debug!(sql = %qp.query, "sqlite execute");
        run_blocking(handle, move |conn| {
            let values = params::convert(&qp.params);
            let affected = conn.execute(&qp.query, rusqlite::params_from_iter(values))?;
            Ok(affected as u64)
        })
        .await
    }

    async fn run_batch(&self, sql: String) -> Result<(), StoreMiddlewareError> {
        let handle = self.handle()?;
        debug!(sql = %sql, "sqlite batch");
        run_blocking(handle, move |conn| {
            conn.execute_batch(&sql)?;
            Ok(())
        })
        .await
    }
}

pub(crate) async fn run_blocking<F, R>(
    conn: SharedConnection,
    func: F,
) -> Result<R, StoreMiddlewareError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, StoreMiddlewareError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| {
        StoreMiddlewareError::ExecutionError(format!("sqlite spawn_blocking join error: {e}"))
    })?
}

#[async_trait]
impl StoreAdapter for SqliteAdapter {
    async fn connect(&mut self) -> Result<(), StoreMiddlewareError> {
        if self.conn.is_some() {
            return Ok(());
        }
        self.config.validate()?;
        let db_path = self.config.db_path.clone();
        let conn = tokio::task::spawn_blocking(
            move || -> Result<rusqlite::Connection, StoreMiddlewareError> {
                let conn = rusqlite::Connection::open(db_path)?;
                conn.execute_batch("PRAGMA journal_mode = WAL;")?;
                Ok(conn)
            },
        )
        .await
        .map_err(|e| {
            StoreMiddlewareError::ExecutionError(format!("sqlite spawn_blocking join error: {e}"))
        })??;
        self.conn = Some(Arc::new(Mutex::new(conn)));
        debug!(db_path = %self.config.db_path, "sqlite adapter connected");
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), StoreMiddlewareError> {
        // Dropping the handle rolls back any open transaction.
        self.in_transaction = false;
        if self.conn.take().is_some() {
            debug!("sqlite adapter disconnected");
        }
        Ok(())
    }

    async fn insert(&mut self, table: &str, row: &Record) -> Result<Value, StoreMiddlewareError> {
        let handle = self.handle()?;
        let qp = builder::insert(&Dialect::SQLITE, table, row)?;
        debug!(sql = %qp.query, "sqlite insert");
        run_blocking(handle, move |conn| {
            let values = params::convert(&qp.params);
            conn.execute(&qp.query, rusqlite::params_from_iter(values))?;
            Ok(Value::Int(conn.last_insert_rowid()))
        })
        .await
    }

    async fn update(
        &mut self,
        table: &str,
        selector: &Selector,
        updates: &Record,
    ) -> Result<u64, StoreMiddlewareError> {
        self.handle()?;
        let qp = builder::update(&Dialect::SQLITE, table, selector, updates)?;
        self.run_execute(qp).await
    }

    async fn delete(
        &mut self,
        table: &str,
        selector: &Selector,
    ) -> Result<u64, StoreMiddlewareError> {
        self.handle()?;
        let qp = builder::delete(&Dialect::SQLITE, table, selector);
        self.run_execute(qp).await
    }

    async fn find_by_id(
        &mut self,
        table: &str,
        id: &Value,
    ) -> Result<Option<Record>, StoreMiddlewareError> {
        let criteria = Record::new().with(builder::ID_COLUMN, id.clone());
        self.find_one(table, &criteria, &FindOptions::new()).await
    }

    async fn find_by(
        &mut self,
        table: &str,
        column: &str,
        value: &Value,
    ) -> Result<Vec<Record>, StoreMiddlewareError> {
        let criteria = Record::new().with(column, value.clone());
        self.find_all(table, &criteria, &FindOptions::new()).await
    }

    async fn find_all(
        &mut self,
        table: &str,
        criteria: &Record,
        options: &FindOptions,
    ) -> Result<Vec<Record>, StoreMiddlewareError> {
        self.handle()?;
        let qp = builder::select(&Dialect::SQLITE, table, criteria, options);
        self.run_select(qp).await
    }

    async fn find_one(
        &mut self,
        table: &str,
        criteria: &Record,
        options: &FindOptions,
    ) -> Result<Option<Record>, StoreMiddlewareError> {
        let mut options = options.clone();
        options.limit = Some(1);
        let rows = self.find_all(table, criteria, &options).await?;
        Ok(rows.into_iter().next())
    }

    async fn count(
        &mut self,
        table: &str,
        criteria: &Record,
    ) -> Result<u64, StoreMiddlewareError> {
        self.handle()?;
        let qp = builder::count(&Dialect::SQLITE, table, criteria);
        let rows = self.run_select(qp).await?;
        count_from_rows(&rows)
    }

    async fn create_table(
        &mut self,
        table: &str,
        schema: &Schema,
    ) -> Result<(), StoreMiddlewareError> {
        self.handle()?;
        let sql = builder::create_table(&Dialect::SQLITE, table, schema)?;
        self.run_batch(sql).await
    }

    async fn drop_table(&mut self, table: &str) -> Result<(), StoreMiddlewareError> {
        self.handle()?;
        let sql = builder::drop_table(&Dialect::SQLITE, table);
        self.run_batch(sql).await
    }

    async fn create_index(
        &mut self,
        table: &str,
        columns: &[&str],
        options: &IndexOptions,
    ) -> Result<(), StoreMiddlewareError> {
        self.handle()?;
        let sql = builder::create_index(&Dialect::SQLITE, table, columns, options)?;
        self.run_batch(sql).await
    }

    async fn drop_index(&mut self, table: &str, name: &str) -> Result<(), StoreMiddlewareError> {
        self.handle()?;
        let sql = builder::drop_index(&Dialect::SQLITE, table, name);
        self.run_batch(sql).await
    }

    async fn begin_transaction(&mut self) -> Result<(), StoreMiddlewareError> {
        self.handle()?;
        if self.in_transaction {
            return Err(StoreMiddlewareError::tx_already_active());
        }
        self.run_batch("BEGIN".to_string()).await?;
        self.in_transaction = true;
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), StoreMiddlewareError> {
        self.handle()?;
        if !self.in_transaction {
            return Err(StoreMiddlewareError::tx_not_active());
        }
        // Clear the slot before the terminal statement so it is consumed
        // exactly once even if COMMIT itself fails.
        self.in_transaction = false;
        self.run_batch("COMMIT".to_string()).await
    }

    async fn rollback(&mut self) -> Result<(), StoreMiddlewareError> {
        self.handle()?;
        if !self.in_transaction {
            return Err(StoreMiddlewareError::tx_not_active());
        }
        self.in_transaction = false;
        self.run_batch("ROLLBACK".to_string()).await
    }
}
