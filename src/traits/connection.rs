use std::ops::{Deref, DerefMut};

use async_trait::async_trait;

use crate::error::{RedisqlError, Result};
use crate::types::Reply;

/// One handle to the backend.
///
/// Implementations translate `call` into their transport and surface backend
/// error replies as `RedisqlError::BackendExecution`.
#[async_trait]
pub trait BackendConnection: Send {
    /// Issue a command verb with string arguments and return its reply.
    async fn call(&mut self, command: &str, args: Vec<String>) -> Result<Reply>;

    /// Atomically set `key` only if it does not exist yet.
    /// Returns true when this call created the key.
    async fn set_if_absent(&mut self, key: &str, value: &str) -> Result<bool> {
        match self
            .call("SETNX", vec![key.to_string(), value.to_string()])
            .await?
        {
            Reply::Integer(n) => Ok(n == 1),
            other => Err(RedisqlError::UnexpectedReply(format!(
                "SETNX returned {other:?}"
            ))),
        }
    }

    async fn delete(&mut self, key: &str) -> Result<()> {
        self.call("DEL", vec![key.to_string()]).await.map(|_| ())
    }

    /// False once the handle should not be handed out again.
    fn is_healthy(&self) -> bool {
        true
    }
}

/// Lends backend handles. Acquisition may fail with `PoolExhausted`.
#[async_trait]
pub trait ConnectionPool: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn BackendConnection>>;

    /// Takes a handle back. Must not block.
    fn release(&self, conn: Box<dyn BackendConnection>);
}

/// A handle borrowed from a pool for one call. Dropping it releases the
/// handle, so every exit path returns it, including `?` and panics.
pub struct ConnectionGuard<'a> {
    pool: &'a dyn ConnectionPool,
    conn: Option<Box<dyn BackendConnection>>,
}

impl<'a> ConnectionGuard<'a> {
    pub async fn acquire(pool: &'a dyn ConnectionPool) -> Result<ConnectionGuard<'a>> {
        let conn = pool.acquire().await?;
        Ok(Self {
            pool,
            conn: Some(conn),
        })
    }
}

impl Deref for ConnectionGuard<'_> {
    type Target = dyn BackendConnection;

    fn deref(&self) -> &Self::Target {
        // Only `drop` takes the handle out.
        self.conn.as_deref().expect("connection already released")
    }
}

impl DerefMut for ConnectionGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.conn.as_deref_mut().expect("connection already released")
    }
}

impl Drop for ConnectionGuard<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.release(conn);
        }
    }
}
