// SQL Server module - pooled engine without RETURNING support
//
// This module is split into several sub-modules:
// - config: connection configuration
// - pool: deadpool Manager for Tiberius clients
// - params: parameter conversion between middleware and Tiberius types
// - query: result extraction and statement execution
// - adapter: the StoreAdapter implementation over the pool

pub mod adapter;
pub mod config;
pub mod params;
pub mod pool;
pub mod query;

pub use adapter::MssqlAdapter;
pub use config::MssqlConfig;
pub use pool::{MssqlClient, MssqlManager};
