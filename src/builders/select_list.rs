use crate::builders::SelectQuery;
use crate::error::{RedisqlError, Result};
use crate::types::{split_alias, FieldOrder, Params, SqlValue};

/// A SQL expression used inside a select list.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Raw SQL text, rendered verbatim.
    Raw(String),
    /// A value, rendered as a bound `?N` placeholder.
    Value(SqlValue),
}

impl Expression {
    pub fn raw(sql: impl Into<String>) -> Self {
        Expression::Raw(sql.into())
    }

    pub fn value(value: impl Into<SqlValue>) -> Self {
        Expression::Value(value.into())
    }

    fn build(&self, params: &mut Params) -> String {
        match self {
            Expression::Raw(sql) => sql.clone(),
            Expression::Value(value) => params.bind(value.clone()),
        }
    }
}

/// One entry of a select list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// A column name, `table.column`, or text that already carries its alias
    /// (`expr AS alias` or `expr alias`).
    Column(String),
    /// Column or raw expression with an explicit alias.
    Aliased { expr: String, alias: String },
    /// Expression with an optional alias.
    Expression {
        expr: Expression,
        alias: Option<String>,
    },
    /// Nested query rendered as `(<sql>) AS alias`.
    Subquery {
        query: Box<SelectQuery>,
        alias: String,
    },
}

impl SelectItem {
    pub fn column(name: impl Into<String>) -> Self {
        SelectItem::Column(name.into())
    }

    pub fn aliased(expr: impl Into<String>, alias: impl Into<String>) -> Self {
        SelectItem::Aliased {
            expr: expr.into(),
            alias: alias.into(),
        }
    }

    pub fn expression(expr: Expression) -> Self {
        SelectItem::Expression { expr, alias: None }
    }

    pub fn expression_as(expr: Expression, alias: impl Into<String>) -> Self {
        SelectItem::Expression {
            expr,
            alias: Some(alias.into()),
        }
    }

    pub fn subquery(query: SelectQuery, alias: impl Into<String>) -> Self {
        SelectItem::Subquery {
            query: Box::new(query),
            alias: alias.into(),
        }
    }

    /// Wildcards need a catalog to expand, which the backend does not have.
    fn check_wildcard(&self) -> Result<()> {
        let offending = match self {
            SelectItem::Column(text) => text.contains('*').then_some(text.as_str()),
            SelectItem::Aliased { expr, .. } => expr.contains('*').then_some(expr.as_str()),
            SelectItem::Expression {
                expr: Expression::Raw(sql),
                ..
            } => {
                let sql = sql.trim();
                (sql == "*" || sql.ends_with(".*")).then_some(sql)
            }
            SelectItem::Expression { .. } | SelectItem::Subquery { .. } => None,
        };
        match offending {
            Some(text) => Err(RedisqlError::UnsupportedQuery(format!(
                "wildcard select '{text}' cannot be expanded without a schema"
            ))),
            None => Ok(()),
        }
    }
}

impl From<&str> for SelectItem {
    fn from(value: &str) -> Self {
        SelectItem::Column(value.to_string())
    }
}

impl From<String> for SelectItem {
    fn from(value: String) -> Self {
        SelectItem::Column(value)
    }
}

impl From<Expression> for SelectItem {
    fn from(value: Expression) -> Self {
        SelectItem::expression(value)
    }
}

/// Renders a select list and records the output field of every item.
///
/// Returns the comma-separated fragment (without the `SELECT` keyword) and
/// the field order the backend's tuples will follow. Values bound by
/// expressions and subqueries are appended to `params` in render order.
pub fn normalize(items: &[SelectItem], params: &mut Params) -> Result<(String, FieldOrder)> {
    if items.is_empty() {
        return Err(RedisqlError::UnsupportedQuery(
            "select list must name its columns explicitly".to_string(),
        ));
    }
    for item in items {
        item.check_wildcard()?;
    }

    let mut fragments = Vec::with_capacity(items.len());
    let mut names = Vec::with_capacity(items.len());

    for item in items {
        let (sql, name) = match item {
            SelectItem::Expression { expr, alias } => {
                let sql = expr.build(params);
                match alias {
                    Some(alias) => (format!("{sql} AS {alias}"), alias.clone()),
                    None => (sql.clone(), sql),
                }
            }
            SelectItem::Subquery { query, alias } => {
                let built = query.build(params)?;
                (format!("({}) AS {alias}", built.sql), alias.clone())
            }
            SelectItem::Aliased { expr, alias } => (format!("{expr} AS {alias}"), alias.clone()),
            SelectItem::Column(text) => match split_alias(text) {
                // Function calls keep their text; only plain columns are rewritten.
                Some((_, alias)) if text.contains('(') => (text.clone(), alias.to_string()),
                Some((base, alias)) => (format!("{base} AS {alias}"), alias.to_string()),
                None => (text.clone(), text.clone()),
            },
        };
        fragments.push(sql);
        names.push(name);
    }

    Ok((fragments.join(", "), FieldOrder::new(names)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(order: &FieldOrder) -> Vec<&str> {
        order.names().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_plain_and_inline_alias_columns() {
        let mut params = Params::default();
        let items = vec![SelectItem::from("name"), SelectItem::from("age AS years")];
        let (sql, order) = normalize(&items, &mut params).unwrap();

        assert_eq!(sql, "name, age AS years");
        assert_eq!(names(&order), vec!["name", "years"]);
        assert!(params.is_empty());
    }

    #[test]
    fn test_space_alias_is_rewritten_with_as() {
        let mut params = Params::default();
        let items = vec![SelectItem::from("u.age years"), SelectItem::from("u.id")];
        let (sql, order) = normalize(&items, &mut params).unwrap();

        assert_eq!(sql, "u.age AS years, u.id");
        assert_eq!(names(&order), vec!["years", "u.id"]);
    }

    #[test]
    fn test_function_column_keeps_text() {
        let mut params = Params::default();
        let items = vec![
            SelectItem::from("COUNT(id) total"),
            SelectItem::from("MAX(age)"),
        ];
        let (sql, order) = normalize(&items, &mut params).unwrap();

        assert_eq!(sql, "COUNT(id) total, MAX(age)");
        assert_eq!(names(&order), vec!["total", "MAX(age)"]);
    }

    #[test]
    fn test_expressions_and_map_style_aliases() {
        let mut params = Params::default();
        let items = vec![
            SelectItem::expression_as(Expression::raw("LENGTH(name)"), "len"),
            SelectItem::expression(Expression::value(7)),
            SelectItem::aliased("users.name", "who"),
        ];
        let (sql, order) = normalize(&items, &mut params).unwrap();

        assert_eq!(sql, "LENGTH(name) AS len, ?1, users.name AS who");
        assert_eq!(names(&order), vec!["len", "?1", "who"]);
        assert_eq!(params, Params::named([("?1", SqlValue::Int(7))]));
    }

    #[test]
    fn test_subquery_shares_parameter_numbering() {
        let mut params = Params::default();
        params.bind(SqlValue::from("outer"));

        let inner = SelectQuery::new()
            .select(["COUNT(id)"])
            .from("orders")
            .where_(crate::WhereClause::eq("status", "open"));
        let items = vec![SelectItem::from("id"), SelectItem::subquery(inner, "open_orders")];
        let (sql, order) = normalize(&items, &mut params).unwrap();

        assert_eq!(
            sql,
            "id, (SELECT COUNT(id) FROM orders WHERE status = ?2) AS open_orders"
        );
        assert_eq!(names(&order), vec!["id", "open_orders"]);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_field_order_length_matches_items() {
        let mut params = Params::default();
        let items: Vec<SelectItem> = ["a", "b AS c", "d e", "f.g"]
            .into_iter()
            .map(SelectItem::from)
            .collect();
        let (_, order) = normalize(&items, &mut params).unwrap();
        assert_eq!(order.len(), items.len());
    }

    #[test]
    fn test_empty_select_is_unsupported() {
        let mut params = Params::default();
        let err = normalize(&[], &mut params).unwrap_err();
        assert!(matches!(err, RedisqlError::UnsupportedQuery(_)));
    }

    #[test]
    fn test_wildcards_are_unsupported() {
        for item in [
            SelectItem::from("*"),
            SelectItem::from("users.*"),
            SelectItem::aliased("COUNT(*)", "n"),
            SelectItem::expression(Expression::raw("t.*")),
        ] {
            let mut params = Params::default();
            let err = normalize(&[SelectItem::from("id"), item], &mut params).unwrap_err();
            assert!(matches!(err, RedisqlError::UnsupportedQuery(_)));
        }
    }

    #[test]
    fn test_raw_count_star_expression_is_allowed() {
        let mut params = Params::default();
        let items = vec![SelectItem::expression_as(Expression::raw("COUNT(*)"), "n")];
        let (sql, _) = normalize(&items, &mut params).unwrap();
        assert_eq!(sql, "COUNT(*) AS n");
    }
}
