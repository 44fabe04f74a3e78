// Document store module - MongoDB-backed engine
//
// Tables map to collections and records map to documents. The generated key
// lives in `_id` but is surfaced under the common `id` name so callers see
// the same shape as the SQL engines.

pub mod adapter;
pub mod config;
pub mod convert;

pub use adapter::MongoAdapter;
pub use config::MongoConfig;
