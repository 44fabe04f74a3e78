use serde::{Deserialize, Serialize};
use tiberius::AuthMethod;

use crate::error::StoreMiddlewareError;

/// Connection configuration for the pooled SQL Server engine.
///
/// Host, user, password, and database are required; `port` defaults to 1433
/// and `pool_size` to 20. Validation happens in `connect()`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MssqlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub pool_size: Option<usize>,
}

impl MssqlConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn validate(&self) -> Result<(), StoreMiddlewareError> {
        if self.host.is_none() {
            return Err(StoreMiddlewareError::ConfigError(
                "host is required".to_string(),
            ));
        }
        if self.user.is_none() {
            return Err(StoreMiddlewareError::ConfigError(
                "user is required".to_string(),
            ));
        }
        if self.password.is_none() {
            return Err(StoreMiddlewareError::ConfigError(
                "password is required".to_string(),
            ));
        }
        if self.database.is_none() {
            return Err(StoreMiddlewareError::ConfigError(
                "database is required".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn effective_port(&self) -> u16 {
        self.port.unwrap_or(1433)
    }

    pub(crate) fn effective_pool_size(&self) -> usize {
        self.pool_size.unwrap_or(20)
    }

    /// Build the Tiberius configuration. Call only after `validate()`.
    pub(crate) fn to_tiberius(&self) -> Result<tiberius::Config, StoreMiddlewareError> {
        let host = self
            .host
            .as_ref()
            .ok_or_else(|| StoreMiddlewareError::ConfigError("host is required".to_string()))?;
        let user = self
            .user
            .as_ref()
            .ok_or_else(|| StoreMiddlewareError::ConfigError("user is required".to_string()))?;
        let password = self
            .password
            .as_ref()
            .ok_or_else(|| StoreMiddlewareError::ConfigError("password is required".to_string()))?;
        let database = self.database.as_ref().ok_or_else(|| {
            StoreMiddlewareError::ConfigError("database is required".to_string())
        })?;

        let mut config = tiberius::Config::new();
        config.host(host);
        config.port(self.effective_port());
        config.database(database);
        config.authentication(AuthMethod::sql_server(user, password));
        Ok(config)
    }
}
