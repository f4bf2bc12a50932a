mod decode;
mod executor;
mod raw_sql;
mod registry;

use std::sync::Arc;

pub use decode::{decode, Decoded, FetchMode};
pub use executor::{CommandExecutor, Verb};
pub use raw_sql::render as render_raw_sql;
pub use registry::{statement_id, StatementRegistry};

use crate::error::{RedisqlError, Result};
use crate::types::{FieldOrder, Params, SqlValue, Value};

/// Finalized SQL plus its bound parameters, ready to run.
///
/// A command owns copies of everything it needs, so changing the query it
/// was built from has no effect on it.
#[derive(Clone)]
pub struct Command {
    executor: Arc<CommandExecutor>,
    sql: String,
    params: Params,
    field_order: Option<FieldOrder>,
}

impl Command {
    pub(crate) fn new(executor: Arc<CommandExecutor>, sql: String, params: Params) -> Self {
        Self {
            executor,
            sql,
            params,
            field_order: None,
        }
    }

    pub(crate) fn with_field_order(mut self, field_order: FieldOrder) -> Self {
        self.field_order = Some(field_order);
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Output fields of the select this command was built from, if any.
    pub fn field_order(&self) -> Option<&FieldOrder> {
        self.field_order.as_ref()
    }

    /// Binds one more named value. Fails if the command already uses
    /// positional parameters.
    pub fn bind_value(
        mut self,
        name: impl Into<String>,
        value: impl Into<SqlValue>,
    ) -> Result<Self> {
        let name = name.into();
        let value = value.into();
        match &mut self.params {
            Params::Named(pairs) => {
                match pairs.iter_mut().find(|(key, _)| *key == name) {
                    Some(pair) => pair.1 = value,
                    None => pairs.push((name, value)),
                }
                Ok(self)
            }
            Params::Positional(values) if values.is_empty() => {
                self.params = Params::Named(vec![(name, value)]);
                Ok(self)
            }
            Params::Positional(_) => Err(RedisqlError::UnsupportedQuery(format!(
                "cannot bind named value '{name}' to a positional statement"
            ))),
        }
    }

    /// The SQL with parameters substituted, for logs only.
    pub fn raw_sql(&self) -> String {
        render_raw_sql(&self.sql, &self.params)
    }

    /// Runs the command as a mutation and returns the affected-row count.
    pub async fn execute(&self) -> Result<u64> {
        self.executor.execute(&self.sql, &self.params).await
    }

    /// Runs the command as a read. `None` is the backend's no-effect marker.
    pub async fn query(&self, mode: FetchMode) -> Result<Option<Decoded>> {
        self.executor.query(&self.sql, &self.params, mode).await
    }

    pub async fn query_one(&self) -> Result<Option<Vec<Value>>> {
        Ok(self.query(FetchMode::Row).await?.and_then(Decoded::into_row))
    }

    pub async fn query_all(&self) -> Result<Vec<Vec<Value>>> {
        Ok(self
            .query(FetchMode::AllRows)
            .await?
            .map(Decoded::into_rows)
            .unwrap_or_default())
    }

    pub async fn query_column(&self) -> Result<Vec<Value>> {
        Ok(self
            .query(FetchMode::Column)
            .await?
            .map(Decoded::into_column)
            .unwrap_or_default())
    }

    pub async fn query_scalar(&self) -> Result<Option<Value>> {
        Ok(self
            .query(FetchMode::Scalar)
            .await?
            .and_then(Decoded::into_scalar))
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("sql", &self.sql)
            .field("params", &self.params)
            .field("field_order", &self.field_order)
            .finish()
    }
}
