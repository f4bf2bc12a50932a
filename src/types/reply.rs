use std::fmt;

use crate::error::{RedisqlError, Result};

/// A reply frame from the backend, independent of the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Nil,
    Status(String),
    Integer(i64),
    Bulk(String),
    Array(Vec<Reply>),
}

impl Reply {
    pub fn bulk(value: impl Into<String>) -> Self {
        Reply::Bulk(value.into())
    }

    /// The `DONE, 0` pair the backend sends for a statement that touched nothing.
    pub fn done() -> Self {
        Reply::Array(vec![Reply::bulk("DONE"), Reply::Integer(0)])
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            Reply::Status(s) | Reply::Bulk(s) => Some(s),
            _ => None,
        }
    }

    fn as_count(&self) -> Option<i64> {
        match self {
            Reply::Integer(n) => Some(*n),
            Reply::Status(s) | Reply::Bulk(s) => s.parse().ok(),
            _ => None,
        }
    }
}

/// A single positional value inside a result tuple.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Text(s) => s.parse().ok(),
            Value::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl TryFrom<Reply> for Value {
    type Error = RedisqlError;

    fn try_from(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Nil => Ok(Value::Null),
            Reply::Integer(n) => Ok(Value::Integer(n)),
            Reply::Status(s) | Reply::Bulk(s) => Ok(Value::Text(s)),
            Reply::Array(_) => Err(RedisqlError::UnexpectedReply(
                "nested array inside a result tuple".to_string(),
            )),
        }
    }
}

/// Result of one backend command, before it is shaped for a fetch mode.
/// Tuples carry no column names.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResult {
    /// The `DONE, 0` sentinel: the command completed with no effect.
    Done,
    /// A mutation reported this many affected rows.
    Affected(u64),
    /// Positional tuples.
    Rows(Vec<Vec<Value>>),
}

impl RawResult {
    pub fn rows(rows: Vec<Vec<Value>>) -> Self {
        RawResult::Rows(rows)
    }

    pub fn is_done(&self) -> bool {
        matches!(self, RawResult::Done)
    }

    /// Interprets a backend reply.
    pub fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Nil => Ok(RawResult::Done),
            Reply::Integer(n) => Ok(affected(n)),
            Reply::Status(_) => Ok(RawResult::Done),
            Reply::Bulk(s) => Err(RedisqlError::UnexpectedReply(format!(
                "bare value '{s}' where rows or a DONE marker were expected"
            ))),
            Reply::Array(items) => {
                if let [marker, count] = items.as_slice() {
                    if marker.as_text() == Some("DONE") {
                        return match count.as_count() {
                            Some(n) => Ok(affected(n)),
                            None => Err(RedisqlError::UnexpectedReply(format!(
                                "DONE marker with non-numeric count {count:?}"
                            ))),
                        };
                    }
                }

                let rows = items
                    .into_iter()
                    .map(|item| match item {
                        Reply::Array(values) => values
                            .into_iter()
                            .map(Value::try_from)
                            .collect::<Result<Vec<_>>>(),
                        other => Err(RedisqlError::UnexpectedReply(format!(
                            "expected a row tuple, got {other:?}"
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(RawResult::Rows(rows))
            }
        }
    }
}

fn affected(n: i64) -> RawResult {
    if n <= 0 {
        RawResult::Done
    } else {
        RawResult::Affected(n as u64)
    }
}
