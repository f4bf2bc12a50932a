use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::command::decode::{decode, Decoded, FetchMode};
use crate::command::raw_sql;
use crate::command::registry::StatementRegistry;
use crate::config::ClientOptions;
use crate::error::{RedisqlError, Result};
use crate::traits::{BackendConnection, ConnectionGuard, ConnectionPool};
use crate::types::{Params, RawResult, Reply};

/// Backend command verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Exec,
    Query,
    CreateStatement,
    ExecStatement,
    QueryStatement,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Exec => "REDISQL.EXEC",
            Verb::Query => "REDISQL.QUERY",
            Verb::CreateStatement => "REDISQL.CREATE_STATEMENT",
            Verb::ExecStatement => "REDISQL.EXEC_STATEMENT",
            Verb::QueryStatement => "REDISQL.QUERY_STATEMENT",
        }
    }
}

/// Whether a command mutates or reads; picks the verb pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Mutate,
    Read,
}

impl Intent {
    fn adhoc_verb(self) -> Verb {
        match self {
            Intent::Mutate => Verb::Exec,
            Intent::Read => Verb::Query,
        }
    }

    fn statement_verb(self) -> Verb {
        match self {
            Intent::Mutate => Verb::ExecStatement,
            Intent::Read => Verb::QueryStatement,
        }
    }
}

/// Wraps a transport or backend failure with the command that hit it.
pub(crate) fn backend_error(command: &str, err: RedisqlError) -> RedisqlError {
    let message = match err {
        RedisqlError::BackendExecution(msg)
        | RedisqlError::ConnectionFailed(msg)
        | RedisqlError::UnexpectedReply(msg) => msg,
        other => other.to_string(),
    };
    RedisqlError::BackendExecution(format!("{command} failed: {message}"))
}

/// Sends finalized SQL to the backend.
///
/// Commands without parameters go through the ad-hoc verbs. Commands with
/// parameters are registered once as statements and executed by id with
/// their values in binding order.
pub struct CommandExecutor {
    pool: Arc<dyn ConnectionPool>,
    db_name: String,
    registry: StatementRegistry,
    statement_retries: u32,
    retry_backoff: Duration,
}

impl CommandExecutor {
    pub fn new(
        pool: Arc<dyn ConnectionPool>,
        db_name: impl Into<String>,
        options: &ClientOptions,
    ) -> Self {
        Self {
            pool,
            db_name: db_name.into(),
            registry: StatementRegistry::new(options.statement_key_prefix.clone()),
            statement_retries: options.statement_retries,
            retry_backoff: Duration::from_millis(options.retry_backoff_ms),
        }
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    pub fn registry(&self) -> &StatementRegistry {
        &self.registry
    }

    /// Runs a mutating command and returns the affected-row count.
    /// The no-effect marker counts as zero.
    pub async fn execute(&self, sql: &str, params: &Params) -> Result<u64> {
        let raw = self.run(Intent::Mutate, sql, params).await?;
        Ok(decode(raw, FetchMode::Exec).rows_affected())
    }

    /// Runs a read command. `None` means the backend answered with the
    /// no-effect marker rather than a (possibly empty) row set.
    pub async fn query(
        &self,
        sql: &str,
        params: &Params,
        mode: FetchMode,
    ) -> Result<Option<Decoded>> {
        let raw = self.run(Intent::Read, sql, params).await?;
        if raw.is_done() {
            return Ok(None);
        }
        Ok(Some(decode(raw, mode)))
    }

    async fn run(&self, intent: Intent, sql: &str, params: &Params) -> Result<RawResult> {
        debug!(
            target: "redisql",
            db = %self.db_name,
            mutating = intent == Intent::Mutate,
            sql = %raw_sql::render(sql, params),
            "running command"
        );

        let mut conn = ConnectionGuard::acquire(self.pool.as_ref()).await?;

        let (verb, reply) = if params.is_empty() {
            let verb = intent.adhoc_verb();
            let reply = conn
                .call(verb.as_str(), vec![self.db_name.clone(), sql.to_string()])
                .await
                .map_err(|err| backend_error(verb.as_str(), err))?;
            (verb, reply)
        } else {
            let verb = intent.statement_verb();
            let id = self
                .registry
                .ensure_registered(&mut *conn, &self.db_name, sql)
                .await?;
            let reply = self.run_statement(&mut *conn, verb, &id, params).await?;
            (verb, reply)
        };

        RawResult::from_reply(reply).map_err(|err| backend_error(verb.as_str(), err))
    }

    async fn run_statement(
        &self,
        conn: &mut dyn BackendConnection,
        verb: Verb,
        id: &str,
        params: &Params,
    ) -> Result<Reply> {
        let mut args = Vec::with_capacity(params.len() + 2);
        args.push(self.db_name.clone());
        args.push(id.to_string());
        args.extend(params.values().into_iter().map(|value| value.to_arg()));

        let mut attempt = 0u32;
        loop {
            match conn.call(verb.as_str(), args.clone()).await {
                Ok(reply) => return Ok(reply),
                Err(err) => {
                    let err = backend_error(verb.as_str(), err);
                    if attempt < self.statement_retries && err.is_statement_not_found() {
                        attempt += 1;
                        warn!(
                            target: "redisql",
                            statement = %id,
                            attempt,
                            "statement not registered yet, retrying"
                        );
                        tokio::time::sleep(self.retry_backoff).await;
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_keeps_original_message() {
        let err = backend_error(
            Verb::Query.as_str(),
            RedisqlError::BackendExecution("ERR no such table: users".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "Backend execution failed: REDISQL.QUERY failed: ERR no such table: users"
        );
    }

    #[test]
    fn test_intent_verbs() {
        assert_eq!(Intent::Mutate.adhoc_verb(), Verb::Exec);
        assert_eq!(Intent::Read.adhoc_verb(), Verb::Query);
        assert_eq!(Intent::Mutate.statement_verb(), Verb::ExecStatement);
        assert_eq!(Intent::Read.statement_verb(), Verb::QueryStatement);
    }
}
