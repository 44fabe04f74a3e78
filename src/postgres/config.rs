use serde::{Deserialize, Serialize};

use crate::error::StoreMiddlewareError;

/// Connection configuration for the pooled `PostgreSQL` engine.
///
/// All of host/port/user/password/dbname are required; `pool_size` falls
/// back to the pool's default when unset. Validation happens in `connect()`,
/// never at load time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub dbname: Option<String>,
    pub pool_size: Option<usize>,
}

impl PostgresConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn validate(&self) -> Result<(), StoreMiddlewareError> {
        if self.dbname.is_none() {
            return Err(StoreMiddlewareError::ConfigError(
                "dbname is required".to_string(),
            ));
        }
        if self.host.is_none() {
            return Err(StoreMiddlewareError::ConfigError(
                "host is required".to_string(),
            ));
        }
        if self.port.is_none() {
            return Err(StoreMiddlewareError::ConfigError(
                "port is required".to_string(),
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
        Ok(())
    }

    pub(crate) fn to_deadpool(&self) -> deadpool_postgres::Config {
        let mut cfg = deadpool_postgres::Config::new();
        cfg.host = self.host.clone();
        cfg.port = self.port;
        cfg.user = self.user.clone();
        cfg.password = self.password.clone();
        cfg.dbname = self.dbname.clone();
        if let Some(size) = self.pool_size {
            cfg.pool = Some(deadpool_postgres::PoolConfig::new(size));
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> PostgresConfig {
        PostgresConfig {
            host: Some("localhost".to_string()),
            port: Some(5432),
            user: Some("postgres".to_string()),
            password: Some("postgres".to_string()),
            dbname: Some("app".to_string()),
            pool_size: Some(4),
        }
    }

    #[test]
    fn complete_config_validates() {
        assert!(full().validate().is_ok());
    }

    #[test]
    fn each_missing_field_is_reported() {
        for strip in [
            |c: &mut PostgresConfig| c.host = None,
            |c: &mut PostgresConfig| c.port = None,
            |c: &mut PostgresConfig| c.user = None,
            |c: &mut PostgresConfig| c.password = None,
            |c: &mut PostgresConfig| c.dbname = None,
        ] {
            let mut config = full();
            strip(&mut config);
            let err = config.validate().unwrap_err();
            assert!(matches!(err, StoreMiddlewareError::ConfigError(_)));
        }
    }
}
