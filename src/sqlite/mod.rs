// SQLite module - the embedded engine, no pool
//
// This module is split into several sub-modules:
// - config: connection configuration
// - params: parameter conversion between middleware and SQLite types
// - query: result extraction
// - adapter: the StoreAdapter implementation over one shared handle

pub mod adapter;
pub mod config;
pub mod params;
pub mod query;

pub use adapter::SqliteAdapter;
pub use config::SqliteConfig;
