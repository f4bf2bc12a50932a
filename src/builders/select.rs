use crate::builders::select_list::{normalize, SelectItem};
use crate::clauses::WhereClause;
use crate::command::Command;
use crate::error::Result;
use crate::querier::Querier;
use crate::traits::{FromRow, Table};
use crate::types::{FieldOrder, Params, Row, Value};

/// Sort direction of an ORDER BY term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn as_sql(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// SQL text and output field order of one build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub field_order: FieldOrder,
}

/// A SELECT query.
///
/// The query is plain data: it can be cloned, nested as a subquery, and
/// built any number of times. Each build renders a fresh `FieldOrder`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectQuery {
    items: Vec<SelectItem>,
    default_items: Vec<SelectItem>,
    distinct: bool,
    select_option: Option<String>,
    from: Option<String>,
    where_clause: Option<WhereClause>,
    order_by: Vec<(String, Order)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the select list. Repeated items are kept once.
    pub fn select<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SelectItem>,
    {
        self.items.clear();
        self.add_select(items)
    }

    /// Appends to the select list. Repeated items are kept once.
    pub fn add_select<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SelectItem>,
    {
        for item in items {
            let item = item.into();
            if !self.items.contains(&item) {
                self.items.push(item);
            }
        }
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Extra keyword placed right after `SELECT` (and `DISTINCT`).
    pub fn select_option(mut self, option: impl Into<String>) -> Self {
        self.select_option = Some(option.into());
        self
    }

    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.from = Some(table.into());
        self
    }

    /// Selects from `T`. Without an explicit select list the query selects
    /// the table's declared attributes, since the backend cannot expand `*`.
    pub fn from_table<T: Table>(mut self) -> Self {
        self.from = Some(T::table_name().to_string());
        self.default_items = T::attributes()
            .iter()
            .map(|name| SelectItem::column(*name))
            .collect();
        self
    }

    pub fn where_(mut self, clause: WhereClause) -> Self {
        self.where_clause = Some(clause);
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, order: Order) -> Self {
        self.order_by.push((column.into(), order));
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Renders the query, binding its values into `params`.
    ///
    /// Values are numbered after whatever `params` already holds, so a
    /// subquery built into its parent's `params` continues the parent's
    /// placeholder sequence.
    pub fn build(&self, params: &mut Params) -> Result<BuiltQuery> {
        let items = if self.items.is_empty() {
            &self.default_items
        } else {
            &self.items
        };
        let (columns, field_order) = normalize(items, params)?;

        let mut sql = String::with_capacity(128);
        sql.push_str(if self.distinct {
            "SELECT DISTINCT "
        } else {
            "SELECT "
        });
        if let Some(option) = &self.select_option {
            sql.push_str(option);
            sql.push(' ');
        }
        sql.push_str(&columns);

        if let Some(from) = &self.from {
            sql.push_str(" FROM ");
            sql.push_str(from);
        }

        if let Some(where_clause) = &self.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause.build_sql(params));
        }

        if !self.order_by.is_empty() {
            let terms: Vec<String> = self
                .order_by
                .iter()
                .map(|(column, order)| format!("{column} {}", order.as_sql()))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&terms.join(", "));
        }

        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => {
                sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"))
            }
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
            // SQLite needs a LIMIT before OFFSET; -1 means no limit.
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
            (None, None) => {}
        }

        Ok(BuiltQuery { sql, field_order })
    }

    /// Builds the query into a command that owns its SQL, params and field order.
    pub fn create_command(&self, querier: &Querier) -> Result<Command> {
        self.prepare(querier).map(|(command, _)| command)
    }

    /// First row as a named record. Forces `LIMIT 1`.
    pub async fn one(&self, querier: &Querier) -> Result<Option<Row>> {
        let (command, order) = self.clone().limit(1).prepare(querier)?;
        match command.query_one().await? {
            Some(values) => Ok(Some(order.record(values)?)),
            None => Ok(None),
        }
    }

    /// Every row as a named record.
    pub async fn all(&self, querier: &Querier) -> Result<Vec<Row>> {
        let (command, order) = self.prepare(querier)?;
        order.records(command.query_all().await?)
    }

    /// First value of every row.
    pub async fn column(&self, querier: &Querier) -> Result<Vec<Value>> {
        self.create_command(querier)?.query_column().await
    }

    /// First value of the first row.
    pub async fn scalar(&self, querier: &Querier) -> Result<Option<Value>> {
        self.create_command(querier)?.query_scalar().await
    }

    pub async fn one_as<T: FromRow>(&self, querier: &Querier) -> Result<Option<T>> {
        self.one(querier)
            .await?
            .map(|row| T::from_row(&row))
            .transpose()
    }

    pub async fn all_as<T: FromRow>(&self, querier: &Querier) -> Result<Vec<T>> {
        self.all(querier)
            .await?
            .iter()
            .map(T::from_row)
            .collect()
    }

    fn prepare(&self, querier: &Querier) -> Result<(Command, FieldOrder)> {
        let mut params = Params::default();
        let built = self.build(&mut params)?;
        let command = querier
            .command(built.sql, params)
            .with_field_order(built.field_order.clone());
        Ok((command, built.field_order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::Expression;
    use crate::error::RedisqlError;
    use crate::traits::Column;
    use crate::types::SqlValue;

    // Test table and columns
    struct Users;
    struct UsersColumns {
        pub id: UsersId,
        pub name: UsersName,
    }
    struct UsersId;
    struct UsersName;

    impl Table for Users {
        type Columns = UsersColumns;
        fn table_name() -> &'static str {
            "users"
        }
        fn attributes() -> &'static [&'static str] {
            &["id", "name", "age"]
        }
        fn columns() -> Self::Columns {
            UsersColumns {
                id: UsersId,
                name: UsersName,
            }
        }
    }

    impl Column for UsersId {
        fn column_name(&self) -> &'static str {
            "id"
        }
        fn table_name(&self) -> &'static str {
            "users"
        }
    }

    impl Column for UsersName {
        fn column_name(&self) -> &'static str {
            "name"
        }
        fn table_name(&self) -> &'static str {
            "users"
        }
    }

    fn build(query: &SelectQuery) -> (BuiltQuery, Params) {
        let mut params = Params::default();
        let built = query.build(&mut params).unwrap();
        (built, params)
    }

    #[test]
    fn test_build_simple_select() {
        let query = SelectQuery::new().select(["id", "name"]).from("users");
        let (built, params) = build(&query);

        assert_eq!(built.sql, "SELECT id, name FROM users");
        assert_eq!(built.field_order.names(), ["id", "name"]);
        assert!(params.is_empty());
    }

    #[test]
    fn test_build_select_with_typed_columns() {
        let cols = Users::columns();
        let query = SelectQuery::new()
            .select([cols.id.select_item(), cols.name.select_item()])
            .from_table::<Users>()
            .where_(WhereClause::column_eq(&cols.name, "John"));
        let (built, params) = build(&query);

        assert_eq!(
            built.sql,
            "SELECT users.id AS id, users.name AS name FROM users WHERE users.name = ?1"
        );
        assert_eq!(built.field_order.names(), ["id", "name"]);
        assert_eq!(params.values(), vec![&SqlValue::Text("John".to_string())]);
    }

    #[test]
    fn test_from_table_selects_declared_attributes() {
        let (built, _) = build(&SelectQuery::new().from_table::<Users>());
        assert_eq!(built.sql, "SELECT id, name, age FROM users");
        assert_eq!(built.field_order.names(), ["id", "name", "age"]);
    }

    #[test]
    fn test_build_select_with_where_and_limit() {
        let query = SelectQuery::new()
            .select(["id"])
            .from("users")
            .where_(WhereClause::eq("name", "John").and(WhereClause::gt("age", 30)))
            .order_by("id", Order::Desc)
            .limit(10);
        let (built, params) = build(&query);

        assert_eq!(
            built.sql,
            "SELECT id FROM users WHERE (name = ?1) AND (age > ?2) ORDER BY id DESC LIMIT 10"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_offset_without_limit() {
        let query = SelectQuery::new().select(["id"]).from("users").offset(20);
        let (built, _) = build(&query);
        assert_eq!(built.sql, "SELECT id FROM users LIMIT -1 OFFSET 20");
    }

    #[test]
    fn test_distinct_and_select_option() {
        let query = SelectQuery::new()
            .select(["city"])
            .distinct()
            .select_option("ALL")
            .from("users");
        let (built, _) = build(&query);
        assert_eq!(built.sql, "SELECT DISTINCT ALL city FROM users");
    }

    #[test]
    fn test_duplicate_items_are_kept_once() {
        let query = SelectQuery::new()
            .select(["id", "name", "id"])
            .add_select(["name", "age"])
            .from("users");
        let (built, _) = build(&query);
        assert_eq!(built.sql, "SELECT id, name, age FROM users");
    }

    #[test]
    fn test_value_expression_binds_before_where() {
        let query = SelectQuery::new()
            .select([
                SelectItem::column("id"),
                SelectItem::expression_as(Expression::value("tag"), "label"),
            ])
            .from("users")
            .where_(WhereClause::eq("id", 3));
        let (built, params) = build(&query);

        assert_eq!(built.sql, "SELECT id, ?1 AS label FROM users WHERE id = ?2");
        assert_eq!(built.field_order.names(), ["id", "label"]);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_empty_select_is_unsupported() {
        let mut params = Params::default();
        let err = SelectQuery::new()
            .from("users")
            .build(&mut params)
            .unwrap_err();
        assert!(matches!(err, RedisqlError::UnsupportedQuery(_)));
    }

    #[test]
    fn test_rebuild_yields_fresh_field_order() {
        let query = SelectQuery::new().select(["a"]).from("t");
        let (first, _) = build(&query);
        let (second, _) = build(&query.clone().add_select(["b AS c"]));

        assert_eq!(first.field_order.names(), ["a"]);
        assert_eq!(second.field_order.names(), ["a", "c"]);
    }
}
