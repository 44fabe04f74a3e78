use serde::{Deserialize, Serialize};

use crate::error::StoreMiddlewareError;

/// Connection configuration for the document store engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MongoConfig {
    pub uri: Option<String>,
    pub database: Option<String>,
}

impl MongoConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn validate(&self) -> Result<(), StoreMiddlewareError> {
        if self.uri.as_deref().is_none_or(|s| s.trim().is_empty()) {
            return Err(StoreMiddlewareError::ConfigError(
                "uri is required".to_string(),
            ));
        }
        if self.database.as_deref().is_none_or(|s| s.trim().is_empty()) {
            return Err(StoreMiddlewareError::ConfigError(
                "database is required".to_string(),
            ));
        }
        Ok(())
    }
}
