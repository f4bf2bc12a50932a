use std::sync::Arc;

use crate::builders::{DeleteQuery, InsertQuery, SelectItem, SelectQuery, UpdateQuery};
use crate::command::{Command, CommandExecutor};
use crate::types::Params;

/// Query and command factory.
/// Created from a RedisqlClient; every command it makes runs through the
/// client's executor.
#[derive(Clone)]
pub struct Querier {
    executor: Arc<CommandExecutor>,
}

impl Querier {
    pub(crate) fn new(executor: Arc<CommandExecutor>) -> Self {
        Self { executor }
    }

    /// A command for hand-written SQL.
    ///
    /// Named params are substituted by token (`?1`, `:name`); positional
    /// params fill bare `?` marks in order.
    pub fn command(&self, sql: impl Into<String>, params: impl Into<Params>) -> Command {
        Command::new(Arc::clone(&self.executor), sql.into(), params.into())
    }

    /// Start building a SELECT query.
    pub fn select<I, S>(&self, items: I) -> SelectQuery
    where
        I: IntoIterator<Item = S>,
        S: Into<SelectItem>,
    {
        SelectQuery::new().select(items)
    }

    pub fn insert(&self, table: impl Into<String>) -> InsertQuery {
        InsertQuery::new(table)
    }

    pub fn update(&self, table: impl Into<String>) -> UpdateQuery {
        UpdateQuery::new(table)
    }

    pub fn delete(&self, table: impl Into<String>) -> DeleteQuery {
        DeleteQuery::new(table)
    }

    /// Name of the backend database every command targets.
    pub fn db_name(&self) -> &str {
        self.executor.db_name()
    }
}
