use crate::traits::Column;
use crate::types::{Params, SqlValue};

/// Represents a WHERE clause condition.
/// Supports basic comparison operations and logical combinations.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereClause {
    /// column <op> value
    Compare {
        column: String,
        op: &'static str,
        value: SqlValue,
    },
    /// column IS NULL
    IsNull(String),
    /// clause AND clause
    And(Box<WhereClause>, Box<WhereClause>),
    /// clause OR clause
    Or(Box<WhereClause>, Box<WhereClause>),
}

impl WhereClause {
    /// Creates an equality condition. A NULL value renders as `IS NULL`.
    pub fn eq<V: Into<SqlValue>>(column: impl Into<String>, value: V) -> Self {
        match value.into() {
            SqlValue::Null => WhereClause::IsNull(column.into()),
            value => Self::compare(column, "=", value),
        }
    }

    /// Equality on a typed column, using its qualified name.
    pub fn column_eq<C: Column + ?Sized, V: Into<SqlValue>>(column: &C, value: V) -> Self {
        Self::eq(column.qualified_name(), value)
    }

    pub fn ne<V: Into<SqlValue>>(column: impl Into<String>, value: V) -> Self {
        Self::compare(column, "<>", value)
    }

    pub fn gt<V: Into<SqlValue>>(column: impl Into<String>, value: V) -> Self {
        Self::compare(column, ">", value)
    }

    pub fn lt<V: Into<SqlValue>>(column: impl Into<String>, value: V) -> Self {
        Self::compare(column, "<", value)
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        WhereClause::IsNull(column.into())
    }

    fn compare<V: Into<SqlValue>>(column: impl Into<String>, op: &'static str, value: V) -> Self {
        WhereClause::Compare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// Combines this clause with another using AND
    pub fn and(self, other: WhereClause) -> Self {
        WhereClause::And(Box::new(self), Box::new(other))
    }

    /// Combines this clause with another using OR
    pub fn or(self, other: WhereClause) -> Self {
        WhereClause::Or(Box::new(self), Box::new(other))
    }

    /// Builds the SQL fragment, binding values into `params` as `?N`.
    pub fn build_sql(&self, params: &mut Params) -> String {
        match self {
            WhereClause::Compare { column, op, value } => {
                let placeholder = params.bind(value.clone());
                format!("{column} {op} {placeholder}")
            }
            WhereClause::IsNull(column) => format!("{column} IS NULL"),
            WhereClause::And(left, right) => {
                let left_sql = left.build_sql(params);
                let right_sql = right.build_sql(params);
                format!("({left_sql}) AND ({right_sql})")
            }
            WhereClause::Or(left, right) => {
                let left_sql = left.build_sql(params);
                let right_sql = right.build_sql(params);
                format!("({left_sql}) OR ({right_sql})")
            }
        }
    }
}
