use async_trait::async_trait;
use deadpool::managed::{Object, Pool};
use tracing::debug;

use crate::adapter::StoreAdapter;
use crate::error::StoreMiddlewareError;
use crate::mssql::config::MssqlConfig;
use crate::mssql::pool::MssqlManager;
use crate::mssql::query;
use crate::sql::{Dialect, QueryAndParams, builder, count_from_rows};
use crate::types::{FindOptions, IndexOptions, Record, Schema, Selector, Value};

type MssqlPool = Pool<MssqlManager>;

/// Pooled SQL Server adapter.
///
/// T-SQL has no RETURNING clause, so `insert` appends a `SCOPE_IDENTITY()`
/// select to the same statement batch to read the generated key. While a
/// transaction is active, one pooled client is reserved and every operation
/// routes to it; the client goes back to the pool on exactly one of
/// `commit`/`rollback`.
pub struct MssqlAdapter {
    config: MssqlConfig,
    pool: Option<MssqlPool>,
    tx_client: Option<Object<MssqlManager>>,
}

impl MssqlAdapter {
    /// Construct a Disconnected adapter from its config.
    #[must_use]
    pub fn new(config: MssqlConfig) -> Self {
        Self {
            config,
            pool: None,
            tx_client: None,
        }
    }

    fn pool(&self) -> Result<&MssqlPool, StoreMiddlewareError> {
        self.pool
            .as_ref()
            .ok_or_else(|| StoreMiddlewareError::not_connected("mssql"))
    }

    async fn run_query(
        &mut self,
        qp: &QueryAndParams,
    ) -> Result<Vec<Record>, StoreMiddlewareError> {
        let pool = self.pool()?.clone();
        debug!(sql = %qp.query, "mssql query");
        match self.tx_client.as_mut() {
            Some(client) => query::build_result_set(client, &qp.query, &qp.params).await,
            None => {
                let mut client = pool.get().await?;
                query::build_result_set(&mut client, &qp.query, &qp.params).await
            }
        }
    }

    async fn run_execute(&mut self, qp: &QueryAndParams) -> Result<u64, StoreMiddlewareError> {
        let pool = self.pool()?.clone();
        debug!(sql = %qp.query, "mssql execute");
        match self.tx_client.as_mut() {
            Some(client) => query::execute(client, &qp.query, &qp.params).await,
            None => {
                let mut client = pool.get().await?;
                query::execute(&mut client, &qp.query, &qp.params).await
            }
        }
    }

    async fn run_batch(&mut self, sql: &str) -> Result<(), StoreMiddlewareError> {
        let qp = QueryAndParams::new_without_params(sql);
        self.run_execute(&qp).await?;
        Ok(())
    }
}

#[async_trait]
impl StoreAdapter for MssqlAdapter {
    async fn connect(&mut self) -> Result<(), StoreMiddlewareError> {
        if self.pool.is_some() {
            return Ok(());
        }
        self.config.validate()?;
        let tiberius_config = self.config.to_tiberius()?;
        let host = self.config.host.clone().unwrap_or_default();
        let manager = MssqlManager::new(tiberius_config, host, self.config.effective_port());
        let pool = MssqlPool::builder(manager)
            .max_size(self.config.effective_pool_size())
            .build()
            .map_err(|e| {
                StoreMiddlewareError::ConnectionError(format!("Failed to create MSSQL pool: {e}"))
            })?;
        self.pool = Some(pool);
        debug!("mssql adapter connected");
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), StoreMiddlewareError> {
        self.tx_client = None;
        if self.pool.take().is_some() {
            debug!("mssql adapter disconnected");
        }
        Ok(())
    }

    async fn insert(&mut self, table: &str, row: &Record) -> Result<Value, StoreMiddlewareError> {
        self.pool()?;
        let qp = builder::insert(&Dialect::MSSQL, table, row)?;
        // No RETURNING in T-SQL; read the identity from the same batch so a
        // concurrent insert on another connection cannot interleave.
        let batch = format!(
            "{}; SELECT CAST(SCOPE_IDENTITY() AS bigint) AS [id]",
            qp.query
        );
        let rows = self
            .run_query(&QueryAndParams {
                query: batch,
                params: qp.params,
            })
            .await?;
        let id = rows
            .into_iter()
            .next()
            .and_then(|record| record.get(builder::ID_COLUMN).cloned())
            .ok_or_else(|| {
                StoreMiddlewareError::ExecutionError(
                    "insert did not return a generated id".to_string(),
                )
            })?;
        Ok(id)
    }

    async fn update(
        &mut self,
        table: &str,
        selector: &Selector,
        updates: &Record,
    ) -> Result<u64, StoreMiddlewareError> {
        self.pool()?;
        let qp = builder::update(&Dialect::MSSQL, table, selector, updates)?;
        self.run_execute(&qp).await
    }

    async fn delete(
        &mut self,
        table: &str,
        selector: &Selector,
    ) -> Result<u64, StoreMiddlewareError> {
        self.pool()?;
        let qp = builder::delete(&Dialect::MSSQL, table, selector);
        self.run_execute(&qp).await
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
        self.pool()?;
        let qp = builder::select(&Dialect::MSSQL, table, criteria, options);
        self.run_query(&qp).await
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
        self.pool()?;
        let qp = builder::count(&Dialect::MSSQL, table, criteria);
        let rows = self.run_query(&qp).await?;
        count_from_rows(&rows)
    }

    async fn create_table(
        &mut self,
        table: &str,
        schema: &Schema,
    ) -> Result<(), StoreMiddlewareError> {
        self.pool()?;
        let sql = builder::create_table(&Dialect::MSSQL, table, schema)?;
        self.run_batch(&sql).await
    }

    async fn drop_table(&mut self, table: &str) -> Result<(), StoreMiddlewareError> {
        self.pool()?;
        let sql = builder::drop_table(&Dialect::MSSQL, table);
        self.run_batch(&sql).await
    }

    async fn create_index(
        &mut self,
        table: &str,
        columns: &[&str],
        options: &IndexOptions,
    ) -> Result<(), StoreMiddlewareError> {
        self.pool()?;
        let sql = builder::create_index(&Dialect::MSSQL, table, columns, options)?;
        self.run_batch(&sql).await
    }

    async fn drop_index(&mut self, table: &str, name: &str) -> Result<(), StoreMiddlewareError> {
        self.pool()?;
        let sql = builder::drop_index(&Dialect::MSSQL, table, name);
        self.run_batch(&sql).await
    }

    async fn begin_transaction(&mut self) -> Result<(), StoreMiddlewareError> {
        let pool = self.pool()?.clone();
        if self.tx_client.is_some() {
            return Err(StoreMiddlewareError::tx_already_active());
        }
        let mut client = pool.get().await?;
        query::execute(&mut client, "BEGIN TRANSACTION", &[]).await?;
        self.tx_client = Some(client);
        debug!("mssql transaction started");
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), StoreMiddlewareError> {
        self.pool()?;
        // Take the reserved client first so it is released to the pool
        // exactly once, even if COMMIT itself fails.
        let mut client = self
            .tx_client
            .take()
            .ok_or_else(StoreMiddlewareError::tx_not_active)?;
        query::execute(&mut client, "COMMIT TRANSACTION", &[]).await?;
        debug!("mssql transaction committed");
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreMiddlewareError> {
        self.pool()?;
        let mut client = self
            .tx_client
            .take()
            .ok_or_else(StoreMiddlewareError::tx_not_active)?;
        query::execute(&mut client, "ROLLBACK TRANSACTION", &[]).await?;
        debug!("mssql transaction rolled back");
        Ok(())
    }
}
