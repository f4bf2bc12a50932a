use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tracing::warn;

use crate::config::{ClientOptions, ConnectionConfig};
use crate::drivers::RespConnection;
use crate::error::{RedisqlError, Result};
use crate::traits::{BackendConnection, ConnectionPool};

/// Bounded pool of RESP connections.
///
/// At most `pool_size` connections are lent at once; idle ones are reused and
/// unhealthy ones are dropped on release.
pub struct RespPool {
    config: ConnectionConfig,
    idle: Mutex<Vec<Box<dyn BackendConnection>>>,
    permits: Semaphore,
    acquire_timeout: Duration,
}

impl RespPool {
    pub fn new(config: ConnectionConfig, options: &ClientOptions) -> Self {
        Self {
            config,
            idle: Mutex::new(Vec::new()),
            permits: Semaphore::new(options.pool_size.max(1)),
            acquire_timeout: Duration::from_millis(options.acquire_timeout_ms),
        }
    }

    /// Connections currently parked in the pool.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl ConnectionPool for RespPool {
    async fn acquire(&self) -> Result<Box<dyn BackendConnection>> {
        let permit = tokio::time::timeout(self.acquire_timeout, self.permits.acquire())
            .await
            .map_err(|_| {
                RedisqlError::PoolExhausted(format!(
                    "no connection available within {} ms",
                    self.acquire_timeout.as_millis()
                ))
            })?
            .map_err(|_| RedisqlError::PoolExhausted("pool is closed".to_string()))?;

        let parked = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        let conn = match parked {
            Some(conn) => conn,
            None => Box::new(
                RespConnection::connect(
                    &self.config.socket_address(),
                    self.config.password.as_deref(),
                )
                .await?,
            ),
        };

        // The slot is handed back in `release`.
        permit.forget();
        Ok(conn)
    }

    fn release(&self, conn: Box<dyn BackendConnection>) {
        if conn.is_healthy() {
            self.idle
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(conn);
        } else {
            warn!(
                target: "redisql",
                address = %self.config.socket_address(),
                "discarding broken connection"
            );
        }
        self.permits.add_permits(1);
    }
}
