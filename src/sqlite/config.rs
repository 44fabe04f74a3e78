use serde::{Deserialize, Serialize};

use crate::error::StoreMiddlewareError;

/// Connection configuration for the embedded `SQLite` engine.
///
/// `db_path` is a filesystem path or `:memory:`. There is no pool; the
/// adapter owns a single shared handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteConfig {
    pub db_path: String,
}

impl SqliteConfig {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), StoreMiddlewareError> {
        if self.db_path.trim().is_empty() {
            return Err(StoreMiddlewareError::ConfigError(
                "db_path is required".to_string(),
            ));
        }
        Ok(())
    }
}
