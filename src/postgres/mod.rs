// PostgreSQL module - pooled engine with RETURNING support
//
// This module is split into several sub-modules:
// - config: connection configuration and pool setup
// - params: parameter conversion between middleware and PostgreSQL types
// - query: result extraction
// - adapter: the StoreAdapter implementation over a deadpool pool

pub mod adapter;
pub mod config;
pub mod params;
pub mod query;

pub use adapter::PostgresAdapter;
pub use config::PostgresConfig;
