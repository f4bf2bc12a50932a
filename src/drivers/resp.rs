use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use redis_protocol::codec::Resp2;
use redis_protocol::resp2::types::BytesFrame;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

use crate::error::{RedisqlError, Result};
use crate::traits::BackendConnection;
use crate::types::Reply;

/// A single RESP2 connection to the backend.
pub struct RespConnection {
    framed: Framed<TcpStream, Resp2>,
    healthy: bool,
}

impl RespConnection {
    /// Connect to `address` (`host:port`), authenticating when a password is given.
    pub async fn connect(address: &str, password: Option<&str>) -> Result<Self> {
        let socket = TcpStream::connect(address)
            .await
            .map_err(|e| RedisqlError::ConnectionFailed(format!("connect to {address}: {e}")))?;
        socket.set_nodelay(true).ok();

        let mut conn = Self {
            framed: Framed::new(socket, Resp2::default()),
            healthy: true,
        };
        if let Some(password) = password {
            conn.call("AUTH", vec![password.to_string()]).await?;
        }
        Ok(conn)
    }
}

#[async_trait]
impl BackendConnection for RespConnection {
    async fn call(&mut self, command: &str, args: Vec<String>) -> Result<Reply> {
        // Unhealthy until the reply is read: a call dropped mid-flight must
        // not return its connection to the pool.
        self.healthy = false;
        if let Err(err) = self.framed.send(make_command(command, args)).await {
            return Err(RedisqlError::ConnectionFailed(format!(
                "send {command}: {err}"
            )));
        }

        match self.framed.next().await {
            Some(Ok(frame)) => {
                self.healthy = true;
                reply_from_frame(frame)
            }
            Some(Err(err)) => Err(RedisqlError::ConnectionFailed(format!(
                "recv {command}: {err}"
            ))),
            None => Err(RedisqlError::ConnectionFailed(
                "connection closed".to_string(),
            )),
        }
    }

    fn is_healthy(&self) -> bool {
        self.healthy
    }
}

/// Build a RESP command frame: an array of bulk strings.
fn make_command(command: &str, args: Vec<String>) -> BytesFrame {
    let mut parts = Vec::with_capacity(args.len() + 1);
    parts.push(BytesFrame::BulkString(Bytes::from(command.as_bytes().to_vec())));
    parts.extend(
        args.into_iter()
            .map(|arg| BytesFrame::BulkString(Bytes::from(arg.into_bytes()))),
    );
    BytesFrame::Array(parts)
}

/// Interpret a RESP reply. Error frames become `BackendExecution`.
fn reply_from_frame(frame: BytesFrame) -> Result<Reply> {
    match frame {
        BytesFrame::Null => Ok(Reply::Nil),
        BytesFrame::SimpleString(bytes) => {
            Ok(Reply::Status(String::from_utf8_lossy(&bytes).to_string()))
        }
        BytesFrame::BulkString(bytes) => {
            Ok(Reply::Bulk(String::from_utf8_lossy(&bytes).to_string()))
        }
        BytesFrame::Integer(n) => Ok(Reply::Integer(n)),
        BytesFrame::Error(err) => Err(RedisqlError::BackendExecution(err.to_string())),
        BytesFrame::Array(frames) => frames
            .into_iter()
            .map(reply_from_frame)
            .collect::<Result<Vec<_>>>()
            .map(Reply::Array),
    }
}
