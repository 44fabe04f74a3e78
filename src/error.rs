use thiserror::Error;

#[cfg(feature = "sqlite")]
use rusqlite;
#[cfg(feature = "mssql")]
use tiberius;
#[cfg(feature = "postgres")]
use tokio_postgres;

/// Error type shared by every adapter.
///
/// Engine/driver errors pass through transparently and untranslated; the
/// middleware never retries and never maps one engine's failure shape onto
/// another's. The string-carrying variants cover configuration, lifecycle,
/// and transaction-state failures raised before any engine I/O happens.
#[derive(Debug, Error)]
pub enum StoreMiddlewareError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "mssql")]
    #[error(transparent)]
    MssqlError(#[from] tiberius::error::Error),

    #[cfg(feature = "mongodb")]
    #[error(transparent)]
    MongoError(#[from] mongodb::error::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PoolErrorPostgres(#[from] deadpool_postgres::PoolError),

    #[cfg(feature = "mssql")]
    #[error(transparent)]
    PoolErrorMssql(#[from] deadpool::managed::PoolError<tiberius::error::Error>),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Operation invoked while the adapter is Disconnected.
    #[error("Not connected: {0}")]
    NotConnected(String),

    /// Transaction call made in the wrong state (double begin, or
    /// commit/rollback with no transaction active).
    #[error("Transaction state error: {0}")]
    TransactionState(String),

    #[error("Parameter conversion error: {0}")]
    ConversionError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    /// Operation the engine deliberately does not support at this layer.
    #[error("Unimplemented feature: {0}")]
    Unimplemented(String),

    #[error("Other database error: {0}")]
    Other(String),
}

impl StoreMiddlewareError {
    pub(crate) fn not_connected(engine: &str) -> Self {
        StoreMiddlewareError::NotConnected(format!("{engine} adapter is not connected"))
    }

    pub(crate) fn tx_already_active() -> Self {
        StoreMiddlewareError::TransactionState("transaction already in progress".to_string())
    }

    pub(crate) fn tx_not_active() -> Self {
        StoreMiddlewareError::TransactionState("no transaction in progress".to_string())
    }
}
