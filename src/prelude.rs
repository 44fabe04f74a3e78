//! Convenience re-exports for typical usage.
//!
//! ```rust
//! use store_middleware::prelude::*;
//! ```

pub use crate::adapter::StoreAdapter;
pub use crate::error::StoreMiddlewareError;
pub use crate::types::{
    EngineKind, FindOptions, IndexOptions, Record, Schema, Selector, SortDirection, Value,
};

#[cfg(any(feature = "sqlite", feature = "postgres", feature = "mssql"))]
pub use crate::sql::QueryAndParams;

#[cfg(feature = "mongodb")]
pub use crate::mongo::{MongoAdapter, MongoConfig};
#[cfg(feature = "mssql")]
pub use crate::mssql::{MssqlAdapter, MssqlConfig};
#[cfg(feature = "postgres")]
pub use crate::postgres::{PostgresAdapter, PostgresConfig};
#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteAdapter, SqliteConfig};
