use thiserror::Error;

/// Error type for redisql operations
#[derive(Debug, Error)]
pub enum RedisqlError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Invalid connection address: {0}")]
    InvalidAddress(String),

    /// The query shape cannot be expressed against this backend
    /// (empty select list, wildcard expansion). Raised before any RPC call.
    #[error("Unsupported query: {0}")]
    UnsupportedQuery(String),

    #[error("Backend execution failed: {0}")]
    BackendExecution(String),

    #[error("Connection pool exhausted: {0}")]
    PoolExhausted(String),

    #[error("Unexpected reply: {0}")]
    UnexpectedReply(String),

    #[error("Row has {actual} value(s) but the select list has {expected} field(s)")]
    RowShapeMismatch { expected: usize, actual: usize },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),
}

impl RedisqlError {
    /// True when the backend rejected a statement id it does not know yet.
    /// This is what a caller sees when it lost the registration gate and ran
    /// ahead of the winner's CREATE_STATEMENT.
    pub fn is_statement_not_found(&self) -> bool {
        match self {
            RedisqlError::BackendExecution(msg) => {
                let msg = msg.to_ascii_lowercase();
                msg.contains("statement not found") || msg.contains("no statement")
            }
            _ => false,
        }
    }

    /// True when CREATE_STATEMENT hit a statement the backend already holds,
    /// e.g. after the gate key was evicted or written under another prefix.
    pub fn is_statement_already_exists(&self) -> bool {
        match self {
            RedisqlError::BackendExecution(msg) => {
                let msg = msg.to_ascii_lowercase();
                msg.contains("statement already exist")
            }
            _ => false,
        }
    }
}

/// Result type alias for redisql operations
pub type Result<T> = std::result::Result<T, RedisqlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_not_found_classification() {
        let err = RedisqlError::BackendExecution(
            "REDISQL.QUERY_STATEMENT failed: ERR - Statement Not Found".to_string(),
        );
        assert!(err.is_statement_not_found());

        let err = RedisqlError::BackendExecution("syntax error".to_string());
        assert!(!err.is_statement_not_found());

        let err = RedisqlError::ConnectionFailed("statement not found".to_string());
        assert!(!err.is_statement_not_found());
    }

    #[test]
    fn test_unrelated_not_found_is_not_retryable() {
        let err = RedisqlError::BackendExecution(
            "REDISQL.EXEC_STATEMENT failed: ERR database not found".to_string(),
        );
        assert!(!err.is_statement_not_found());

        let err = RedisqlError::BackendExecution("ERR file not found: app.db".to_string());
        assert!(!err.is_statement_not_found());
    }

    #[test]
    fn test_statement_already_exists_classification() {
        let err = RedisqlError::BackendExecution("ERR - Statement already exists".to_string());
        assert!(err.is_statement_already_exists());
        assert!(!err.is_statement_not_found());

        let err = RedisqlError::BackendExecution(
            "REDISQL.CREATE_STATEMENT failed: ERR table users already exists".to_string(),
        );
        assert!(!err.is_statement_already_exists());
    }
}
