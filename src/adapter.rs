use async_trait::async_trait;

use crate::error::StoreMiddlewareError;
use crate::types::{FindOptions, IndexOptions, Record, Schema, Selector, Value};

/// The uniform operation surface implemented once per storage engine.
///
/// The trait makes the contract a compile-time obligation: an engine cannot
/// "forget" an operation and fall through to a runtime stub. Where an engine
/// genuinely lacks a capability (the document store's transactions), its
/// implementation returns [`StoreMiddlewareError::Unimplemented`] explicitly.
///
/// Lifecycle: adapters are constructed Disconnected. `connect()` moves them
/// to Connected and `disconnect()` back again; both are idempotent. Every
/// other operation fails with [`StoreMiddlewareError::NotConnected`] while
/// Disconnected, before any engine I/O. No adapter retries or reconnects.
///
/// Transactions: at most one may be active per adapter instance. Pooled
/// engines reserve one dedicated client for the transaction's lifetime and
/// release it on exactly one of `commit`/`rollback`; the embedded engine
/// flips a guard flag on its single handle.
#[async_trait]
pub trait StoreAdapter {
    /// Establish the connection/pool. Idempotent: a no-op when already
    /// Connected.
    ///
    /// # Errors
    /// Returns `ConfigError` for invalid/missing connection parameters, or
    /// `ConnectionError` if the engine cannot be reached.
    async fn connect(&mut self) -> Result<(), StoreMiddlewareError>;

    /// Release the connection/pool. Idempotent: a no-op when already
    /// Disconnected.
    ///
    /// # Errors
    /// Returns an engine error if teardown fails.
    async fn disconnect(&mut self) -> Result<(), StoreMiddlewareError>;

    /// Insert one row/document; columns follow the record's insertion order.
    /// Returns the engine-generated identifier.
    ///
    /// # Errors
    /// Returns lifecycle or engine errors.
    async fn insert(&mut self, table: &str, row: &Record) -> Result<Value, StoreMiddlewareError>;

    /// Update **all** rows matched by the selector. Zero matches is a valid
    /// `0` result, not an error.
    ///
    /// # Errors
    /// Returns lifecycle or engine errors.
    async fn update(
        &mut self,
        table: &str,
        selector: &Selector,
        updates: &Record,
    ) -> Result<u64, StoreMiddlewareError>;

    /// Delete **all** rows matched by the selector. Zero matches is a valid
    /// `0` result, not an error.
    ///
    /// # Errors
    /// Returns lifecycle or engine errors.
    async fn delete(
        &mut self,
        table: &str,
        selector: &Selector,
    ) -> Result<u64, StoreMiddlewareError>;

    /// Look up a single row by primary key (`id` column, `_id` for the
    /// document store).
    ///
    /// # Errors
    /// Returns lifecycle or engine errors.
    async fn find_by_id(
        &mut self,
        table: &str,
        id: &Value,
    ) -> Result<Option<Record>, StoreMiddlewareError>;

    /// All rows where `column = value`.
    ///
    /// # Errors
    /// Returns lifecycle or engine errors.
    async fn find_by(
        &mut self,
        table: &str,
        column: &str,
        value: &Value,
    ) -> Result<Vec<Record>, StoreMiddlewareError>;

    /// All rows matching the criteria (AND of equality predicates), honoring
    /// limit/offset/sort options. Empty criteria matches everything.
    ///
    /// # Errors
    /// Returns lifecycle or engine errors.
    async fn find_all(
        &mut self,
        table: &str,
        criteria: &Record,
        options: &FindOptions,
    ) -> Result<Vec<Record>, StoreMiddlewareError>;

    /// Exactly `find_all` with the limit forced to 1, returning the first row
    /// or `None`.
    ///
    /// # Errors
    /// Returns lifecycle or engine errors.
    async fn find_one(
        &mut self,
        table: &str,
        criteria: &Record,
        options: &FindOptions,
    ) -> Result<Option<Record>, StoreMiddlewareError>;

    /// Count rows matching the criteria, independent of any limit/offset.
    ///
    /// # Errors
    /// Returns lifecycle or engine errors.
    async fn count(&mut self, table: &str, criteria: &Record)
    -> Result<u64, StoreMiddlewareError>;

    /// Create a table/collection from the schema mapping.
    ///
    /// # Errors
    /// Returns lifecycle or engine errors.
    async fn create_table(
        &mut self,
        table: &str,
        schema: &Schema,
    ) -> Result<(), StoreMiddlewareError>;

    /// Drop a table/collection.
    ///
    /// # Errors
    /// Returns lifecycle or engine errors.
    async fn drop_table(&mut self, table: &str) -> Result<(), StoreMiddlewareError>;

    /// Create an index over the given columns. An unnamed index defaults to
    /// `idx_<table>_<col1>_<col2>...`; the `unique` option adds a uniqueness
    /// constraint.
    ///
    /// # Errors
    /// Returns lifecycle or engine errors.
    async fn create_index(
        &mut self,
        table: &str,
        columns: &[&str],
        options: &IndexOptions,
    ) -> Result<(), StoreMiddlewareError>;

    /// Drop an index by name.
    ///
    /// # Errors
    /// Returns lifecycle or engine errors.
    async fn drop_index(&mut self, table: &str, name: &str)
    -> Result<(), StoreMiddlewareError>;

    /// Start a transaction. Fails with "transaction already in progress" if
    /// one is active on this instance.
    ///
    /// # Errors
    /// Returns lifecycle, transaction-state, or engine errors.
    async fn begin_transaction(&mut self) -> Result<(), StoreMiddlewareError>;

    /// Commit the active transaction. Fails with "no transaction in
    /// progress" when none is active.
    ///
    /// # Errors
    /// Returns lifecycle, transaction-state, or engine errors.
    async fn commit(&mut self) -> Result<(), StoreMiddlewareError>;

    /// Roll back the active transaction. Fails with "no transaction in
    /// progress" when none is active.
    ///
    /// # Errors
    /// Returns lifecycle, transaction-state, or engine errors.
    async fn rollback(&mut self) -> Result<(), StoreMiddlewareError>;
}
