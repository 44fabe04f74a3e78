use async_trait::async_trait;
use deadpool_postgres::{Object, Pool};
use tokio_postgres::NoTls;
use tracing::debug;

use crate::adapter::StoreAdapter;
use crate::error::StoreMiddlewareError;
use crate::postgres::config::PostgresConfig;
use crate::postgres::{params, query};
use crate::sql::{Dialect, QueryAndParams, builder, count_from_rows};
use crate::types::{FindOptions, IndexOptions, Record, Schema, Selector, Value};

/// Pooled `PostgreSQL` adapter.
///
/// RETURNING is supported, so `insert` reads the generated key straight from
/// the insert statement's result row. While a transaction is active, one
/// pooled client is reserved and every operation routes to it; the client
/// goes back to the pool on exactly one of `commit`/`rollback`.
pub struct PostgresAdapter {
    config: PostgresConfig,
    pool: Option<Pool>,
    tx_client: Option<Object>,
}

impl PostgresAdapter {
    /// Construct a Disconnected adapter from its config.
    #[must_use]
    pub fn new(config: PostgresConfig) -> Self {
        Self {
            config,
            pool: None,
            tx_client: None,
        }
    }

    fn pool(&self) -> Result<&Pool, StoreMiddlewareError> {
        self.pool
            .as_ref()
            .ok_or_else(|| StoreMiddlewareError::not_connected("postgres"))
    }

    async fn run_query(
        &mut self,
        qp: &QueryAndParams,
    ) -> Result<Vec<Record>, StoreMiddlewareError> {
        let pool = self.pool()?.clone();
        debug!(sql = %qp.query, "postgres query");
        match self.tx_client.as_ref() {
            Some(client) => query_rows(client, qp).await,
            None => {
                let client = pool.get().await?;
                query_rows(&client, qp).await
            }
        }
    }

    async fn run_execute(&mut self, qp: &QueryAndParams) -> Result<u64, StoreMiddlewareError> {
        let pool = self.pool()?.clone();
        debug!(sql = %qp.query, "postgres execute");
        match self.tx_client.as_ref() {
            Some(client) => execute_on(client, qp).await,
            None => {
                let client = pool.get().await?;
                execute_on(&client, qp).await
            }
        }
    }

    async fn run_batch(&mut self, sql: &str) -> Result<(), StoreMiddlewareError> {
        let pool = self.pool()?.clone();
        debug!(sql = %sql, "postgres batch");
        match self.tx_client.as_ref() {
            Some(client) => {
                client.batch_execute(sql).await?;
                Ok(())
            }
            None => {
                let client = pool.get().await?;
                client.batch_execute(sql).await?;
                Ok(())
            }
        }
    }
}

async fn query_rows(
    client: &tokio_postgres::Client,
    qp: &QueryAndParams,
) -> Result<Vec<Record>, StoreMiddlewareError> {
    let refs = params::as_refs(&qp.params);
    let rows = client.query(&qp.query, &refs).await?;
    query::records_from_rows(&rows)
}

async fn execute_on(
    client: &tokio_postgres::Client,
    qp: &QueryAndParams,
) -> Result<u64, StoreMiddlewareError> {
    let refs = params::as_refs(&qp.params);
    let affected = client.execute(&qp.query, &refs).await?;
    Ok(affected)
}

#[async_trait]
impl StoreAdapter for PostgresAdapter {
    async fn connect(&mut self) -> Result<(), StoreMiddlewareError> {
        if self.pool.is_some() {
            return Ok(());
        }
        self.config.validate()?;
        let pool = self
            .config
            .to_deadpool()
            .create_pool(Some(deadpool_postgres::Runtime::Tokio1), NoTls)
            .map_err(|e| {
                StoreMiddlewareError::ConnectionError(format!(
                    "Failed to create Postgres pool: {e}"
                ))
            })?;
        self.pool = Some(pool);
        debug!("postgres adapter connected");
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), StoreMiddlewareError> {
        // Dropping a reserved client returns it to the pool; dropping the
        // pool closes the remaining connections.
        self.tx_client = None;
        if self.pool.take().is_some() {
            debug!("postgres adapter disconnected");
        }
        Ok(())
    }

    async fn insert(&mut self, table: &str, row: &Record) -> Result<Value, StoreMiddlewareError> {
        self.pool()?;
        let qp = builder::insert(&Dialect::POSTGRES, table, row)?;
        let rows = self.run_query(&qp).await?;
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
        let qp = builder::update(&Dialect::POSTGRES, table, selector, updates)?;
        self.run_execute(&qp).await
    }

    async fn delete(
        &mut self,
        table: &str,
        selector: &Selector,
    ) -> Result<u64, StoreMiddlewareError> {
        self.pool()?;
        let qp = builder::delete(&Dialect::POSTGRES, table, selector);
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
        let qp = builder::select(&Dialect::POSTGRES, table, criteria, options);
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
        let qp = builder::count(&Dialect::POSTGRES, table, criteria);
        let rows = self.run_query(&qp).await?;
        count_from_rows(&rows)
    }

    async fn create_table(
        &mut self,
        table: &str,
        schema: &Schema,
    ) -> Result<(), StoreMiddlewareError> {
        self.pool()?;
        let sql = builder::create_table(&Dialect::POSTGRES, table, schema)?;
        self.run_batch(&sql).await
    }

    async fn drop_table(&mut self, table: &str) -> Result<(), StoreMiddlewareError> {
        self.pool()?;
        let sql = builder::drop_table(&Dialect::POSTGRES, table);
        self.run_batch(&sql).await
    }

    async fn create_index(
        &mut self,
        table: &str,
        columns: &[&str],
        options: &IndexOptions,
    ) -> Result<(), StoreMiddlewareError> {
        self.pool()?;
        let sql = builder::create_index(&Dialect::POSTGRES, table, columns, options)?;
        self.run_batch(&sql).await
    }

    async fn drop_index(&mut self, table: &str, name: &str) -> Result<(), StoreMiddlewareError> {
        self.pool()?;
        let sql = builder::drop_index(&Dialect::POSTGRES, table, name);
        self.run_batch(&sql).await
    }

    async fn begin_transaction(&mut self) -> Result<(), StoreMiddlewareError> {
        let pool = self.pool()?.clone();
        if self.tx_client.is_some() {
            return Err(StoreMiddlewareError::tx_already_active());
        }
        let client = pool.get().await?;
        client.batch_execute("BEGIN").await?;
        self.tx_client = Some(client);
        debug!("postgres transaction started");
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), StoreMiddlewareError> {
        self.pool()?;
        // Take the reserved client first so it is released to the pool
        // exactly once, even if COMMIT itself fails.
        let client = self
            .tx_client
            .take()
            .ok_or_else(StoreMiddlewareError::tx_not_active)?;
        client.batch_execute("COMMIT").await?;
        debug!("postgres transaction committed");
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreMiddlewareError> {
        self.pool()?;
        let client = self
            .tx_client
            .take()
            .ok_or_else(StoreMiddlewareError::tx_not_active)?;
        client.batch_execute("ROLLBACK").await?;
        debug!("postgres transaction rolled back");
        Ok(())
    }
}
