use crate::clauses::WhereClause;
use crate::command::Command;
use crate::error::{RedisqlError, Result};
use crate::querier::Querier;
use crate::types::{Params, SqlValue};

/// NULL is written inline; an empty argument would store '' instead.
fn bind_or_null(params: &mut Params, value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "NULL".to_string(),
        other => params.bind(other.clone()),
    }
}

/// An INSERT of one row.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertQuery {
    table: String,
    values: Vec<(String, SqlValue)>,
}

impl InsertQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            values: Vec::new(),
        }
    }

    /// Adds a column value. `None` and `SqlValue::Null` are written as a
    /// literal NULL rather than bound.
    pub fn value(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.values.push((column.into(), value.into()));
        self
    }

    pub fn values<I, C, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<SqlValue>,
    {
        for (column, value) in values {
            self.values.push((column.into(), value.into()));
        }
        self
    }

    pub fn build(&self, params: &mut Params) -> Result<String> {
        if self.values.is_empty() {
            return Err(RedisqlError::UnsupportedQuery(format!(
                "insert into {} has no values",
                self.table
            )));
        }
        let columns: Vec<&str> = self.values.iter().map(|(c, _)| c.as_str()).collect();
        let placeholders: Vec<String> = self
            .values
            .iter()
            .map(|(_, value)| bind_or_null(params, value))
            .collect();
        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders.join(", ")
        ))
    }

    pub fn create_command(&self, querier: &Querier) -> Result<Command> {
        let mut params = Params::default();
        let sql = self.build(&mut params)?;
        Ok(querier.command(sql, params))
    }

    /// Runs the insert and returns the affected-row count.
    pub async fn execute(&self, querier: &Querier) -> Result<u64> {
        self.create_command(querier)?.execute().await
    }
}

/// An UPDATE of every row matching an optional condition.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQuery {
    table: String,
    assignments: Vec<(String, SqlValue)>,
    where_clause: Option<WhereClause>,
}

impl UpdateQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            assignments: Vec::new(),
            where_clause: None,
        }
    }

    /// Assigns a column. NULL is written inline, as for `InsertQuery::value`.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.assignments.push((column.into(), value.into()));
        self
    }

    pub fn where_(mut self, clause: WhereClause) -> Self {
        self.where_clause = Some(clause);
        self
    }

    pub fn build(&self, params: &mut Params) -> Result<String> {
        if self.assignments.is_empty() {
            return Err(RedisqlError::UnsupportedQuery(format!(
                "update of {} sets no columns",
                self.table
            )));
        }
        let assignments: Vec<String> = self
            .assignments
            .iter()
            .map(|(column, value)| format!("{column} = {}", bind_or_null(params, value)))
            .collect();
        let mut sql = format!("UPDATE {} SET {}", self.table, assignments.join(", "));
        if let Some(where_clause) = &self.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause.build_sql(params));
        }
        Ok(sql)
    }

    pub fn create_command(&self, querier: &Querier) -> Result<Command> {
        let mut params = Params::default();
        let sql = self.build(&mut params)?;
        Ok(querier.command(sql, params))
    }

    pub async fn execute(&self, querier: &Querier) -> Result<u64> {
        self.create_command(querier)?.execute().await
    }
}

/// A DELETE of every row matching an optional condition.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteQuery {
    table: String,
    where_clause: Option<WhereClause>,
}

impl DeleteQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            where_clause: None,
        }
    }

    pub fn where_(mut self, clause: WhereClause) -> Self {
        self.where_clause = Some(clause);
        self
    }

    pub fn build(&self, params: &mut Params) -> String {
        match &self.where_clause {
            Some(where_clause) => format!(
                "DELETE FROM {} WHERE {}",
                self.table,
                where_clause.build_sql(params)
            ),
            None => format!("DELETE FROM {}", self.table),
        }
    }

    pub fn create_command(&self, querier: &Querier) -> Command {
        let mut params = Params::default();
        let sql = self.build(&mut params);
        querier.command(sql, params)
    }

    pub async fn execute(&self, querier: &Querier) -> Result<u64> {
        self.create_command(querier).execute().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_insert() {
        let mut params = Params::default();
        let sql = InsertQuery::new("users")
            .value("name", "Alice")
            .values([("age", SqlValue::from(30)), ("admin", SqlValue::from(false))])
            .build(&mut params)
            .unwrap();

        assert_eq!(sql, "INSERT INTO users (name, age, admin) VALUES (?1, ?2, ?3)");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_empty_insert_is_unsupported() {
        let mut params = Params::default();
        let err = InsertQuery::new("users").build(&mut params).unwrap_err();
        assert!(matches!(err, RedisqlError::UnsupportedQuery(_)));
    }

    #[test]
    fn test_build_update_numbers_where_after_set() {
        let mut params = Params::default();
        let sql = UpdateQuery::new("users")
            .set("name", "Bob")
            .set("age", 41)
            .where_(WhereClause::eq("id", 7))
            .build(&mut params)
            .unwrap();

        assert_eq!(sql, "UPDATE users SET name = ?1, age = ?2 WHERE id = ?3");
        assert_eq!(
            params.values(),
            vec![
                &SqlValue::Text("Bob".to_string()),
                &SqlValue::Int(41),
                &SqlValue::Int(7)
            ]
        );
    }

    #[test]
    fn test_null_values_are_inlined() {
        let mut params = Params::default();
        let sql = InsertQuery::new("users")
            .value("name", "Alice")
            .value("email", None::<&str>)
            .value("age", 30)
            .build(&mut params)
            .unwrap();
        assert_eq!(sql, "INSERT INTO users (name, email, age) VALUES (?1, NULL, ?2)");
        assert_eq!(params.len(), 2);

        let mut params = Params::default();
        let sql = UpdateQuery::new("users")
            .set("email", SqlValue::Null)
            .where_(WhereClause::eq("id", 7))
            .build(&mut params)
            .unwrap();
        assert_eq!(sql, "UPDATE users SET email = NULL WHERE id = ?1");
        assert_eq!(params.values(), vec![&SqlValue::Int(7)]);
    }

    #[test]
    fn test_build_delete() {
        let mut params = Params::default();
        assert_eq!(DeleteQuery::new("users").build(&mut params), "DELETE FROM users");

        let sql = DeleteQuery::new("users")
            .where_(WhereClause::lt("age", 18))
            .build(&mut params);
        assert_eq!(sql, "DELETE FROM users WHERE age < ?1");
    }
}
