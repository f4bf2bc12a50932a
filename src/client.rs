use std::sync::Arc;

use tracing::info;

use crate::command::CommandExecutor;
use crate::config::{ClientOptions, ConnectionConfig};
use crate::drivers::RespPool;
use crate::error::{RedisqlError, Result};
use crate::querier::Querier;
use crate::traits::{ConnectionGuard, ConnectionPool};

const URL_ENV: &str = "REDISQL_URL";

/// Main entry point for redisql.
/// Holds the connection pool and the target database name.
pub struct RedisqlClient {
    executor: Arc<CommandExecutor>,
}

impl RedisqlClient {
    /// Connect to a backend using the provided address.
    ///
    /// # Example
    /// ```ignore
    /// let client = RedisqlClient::connect("redis://localhost:6379/?dbname=app").await?;
    /// ```
    pub async fn connect(address: &str) -> Result<Self> {
        Self::connect_with_options(address, ClientOptions::default()).await
    }

    /// Connect with explicit options. Pool settings in the address win over
    /// those in `options`.
    pub async fn connect_with_options(address: &str, options: ClientOptions) -> Result<Self> {
        let config = ConnectionConfig::parse(address)?;
        let options = config.apply_to(options);
        let pool = Arc::new(RespPool::new(config.clone(), &options));

        // Fail fast on an unreachable backend rather than on the first query.
        drop(ConnectionGuard::acquire(pool.as_ref()).await?);

        info!(
            target: "redisql",
            host = %config.host,
            port = config.port,
            db = %config.db_name,
            pool_size = options.pool_size,
            "connected"
        );
        Ok(Self::with_pool_and_options(pool, config.db_name, &options))
    }

    /// Connect using the address in `REDISQL_URL`.
    pub async fn from_env() -> Result<Self> {
        let address = std::env::var(URL_ENV)
            .map_err(|_| RedisqlError::InvalidAddress(format!("{URL_ENV} is not set")))?;
        Self::connect(&address).await
    }

    /// Create a new client over a custom pool.
    /// Useful for testing or alternative transports.
    pub fn with_pool(pool: Arc<dyn ConnectionPool>, db_name: impl Into<String>) -> Self {
        Self::with_pool_and_options(pool, db_name, &ClientOptions::default())
    }

    pub fn with_pool_and_options(
        pool: Arc<dyn ConnectionPool>,
        db_name: impl Into<String>,
        options: &ClientOptions,
    ) -> Self {
        Self {
            executor: Arc::new(CommandExecutor::new(pool, db_name, options)),
        }
    }

    /// Create a Querier for building and executing queries.
    pub fn querier(&self) -> Querier {
        Querier::new(Arc::clone(&self.executor))
    }

    pub fn db_name(&self) -> &str {
        self.executor.db_name()
    }
}
