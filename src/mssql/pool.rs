use std::fmt;

use deadpool::managed::{Manager, Metrics, RecycleError};
use tiberius::Client;
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

/// Type alias for the SQL Server client
pub type MssqlClient = Client<Compat<TcpStream>>;

/// Manager for SQL Server connections (used with deadpool)
#[derive(Clone)]
pub struct MssqlManager {
    config: tiberius::Config,
    host: String,
    port: u16,
}

impl MssqlManager {
    #[must_use]
    pub fn new(config: tiberius::Config, host: String, port: u16) -> Self {
        Self { config, host, port }
    }
}

impl fmt::Debug for MssqlManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MssqlManager")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl Manager for MssqlManager {
    type Type = MssqlClient;
    type Error = tiberius::error::Error;

    async fn create(&self) -> Result<Self::Type, Self::Error> {
        let config = self.config.clone();

        let addr = format!("{}:{}", self.host, self.port);
        let tcp = TcpStream::connect(addr)
            .await
            .map_err(|e| tiberius::error::Error::Io {
                kind: e.kind(),
                message: format!("TCP connection error: {e}"),
            })?;

        let tcp = tcp.compat_write();
        Client::connect(config, tcp).await
    }

    async fn recycle(
        &self,
        client: &mut Self::Type,
        _metrics: &Metrics,
    ) -> Result<(), RecycleError<Self::Error>> {
        // Check the connection is still usable with a trivial query
        let query = tiberius::Query::new("SELECT 1");
        match query.query(client).await {
            Ok(_) => Ok(()),
            Err(e) => Err(RecycleError::Backend(e)),
        }
    }
}
