//! Unified async data-access middleware.
//!
//! One contract ([`StoreAdapter`]) implemented by four storage engines:
//!
//! - `sqlite` — embedded SQLite via `rusqlite`, single shared handle, no pool
//! - `mssql` — SQL Server via `tiberius`, pooled, `@P1` placeholders, no RETURNING
//! - `postgres` — PostgreSQL via `tokio-postgres`/`deadpool-postgres`, pooled, RETURNING
//! - `mongodb` — MongoDB document store; criteria pass through as native filters
//!
//! Each engine is behind a feature flag of the same name; all four are on by
//! default. Callers construct an adapter from an engine-specific config value,
//! `connect()`, issue CRUD/schema/transaction calls, and `disconnect()`.
//!
//! ```no_run
//! use store_middleware::prelude::*;
//!
//! # async fn demo() -> Result<(), StoreMiddlewareError> {
//! let mut db = SqliteAdapter::new(SqliteConfig::new(":memory:"));
//! db.connect().await?;
//! let id = db
//!     .insert("users", &Record::new().with("name", Value::Text("Ann".into())))
//!     .await?;
//! let row = db.find_by_id("users", &id).await?;
//! # let _ = row;
//! db.disconnect().await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod error;
pub mod prelude;
pub mod types;

#[cfg(any(feature = "sqlite", feature = "postgres", feature = "mssql"))]
pub mod sql;

#[cfg(feature = "mongodb")]
pub mod mongo;
#[cfg(feature = "mssql")]
pub mod mssql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use adapter::StoreAdapter;
pub use error::StoreMiddlewareError;
pub use types::{
    EngineKind, FindOptions, IndexOptions, Record, Schema, Selector, SortDirection, Value,
};
