use std::collections::HashMap;

use crate::{
    error::{RedisqlError, Result},
    traits::Column,
    types::Value,
};

/// Ordered output field names of one query build.
///
/// The backend returns bare tuples, so this is the only source of names:
/// position `i` of every returned tuple belongs to `names()[i]`. It is produced
/// when the select list is normalized and must travel with the command; it is
/// never inferred from a result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldOrder {
    names: Vec<String>,
}

impl FieldOrder {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Record keys, one per position. A name written as `expr AS alias`
    /// contributes only its trailing identifier.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|name| record_key(name))
    }

    /// Turns a positional tuple into a named record.
    pub fn record(&self, values: Vec<Value>) -> Result<Row> {
        if values.len() != self.names.len() {
            return Err(RedisqlError::RowShapeMismatch {
                expected: self.names.len(),
                actual: values.len(),
            });
        }
        let fields = self
            .keys()
            .zip(values)
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        Ok(Row { fields })
    }

    pub fn records(&self, rows: Vec<Vec<Value>>) -> Result<Vec<Row>> {
        rows.into_iter().map(|values| self.record(values)).collect()
    }
}

fn record_key(name: &str) -> &str {
    split_alias(name).map_or(name, |(_, alias)| alias)
}

/// Splits `expr AS alias` or `expr alias` into its base expression and
/// trailing identifier. Returns None when the text ends in anything other
/// than a plain identifier (letters, digits, `_`, `-`, `.`).
pub(crate) fn split_alias(text: &str) -> Option<(&str, &str)> {
    let (base, alias) = text.trim().rsplit_once(char::is_whitespace)?;
    if alias.is_empty()
        || !alias
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return None;
    }
    let base = base.trim_end();
    let base = match base.rsplit_once(char::is_whitespace) {
        Some((head, last)) if last.eq_ignore_ascii_case("as") => head.trim_end(),
        _ => base,
    };
    if base.is_empty() {
        None
    } else {
        Some((base, alias))
    }
}

/// A named record rebuilt from one positional tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    /// Gets a value by field name.
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
            .ok_or_else(|| RedisqlError::ColumnNotFound(name.to_string()))
    }

    /// Gets a value by column, trying the bare column name first and then
    /// the qualified `table.column` form the select list may have used.
    pub fn get_column<C: Column + ?Sized>(&self, column: &C) -> Result<&Value> {
        self.get(column.column_name())
            .or_else(|_| self.get(&column.qualified_name()))
            .map_err(|_| RedisqlError::ColumnNotFound(column.qualified_name()))
    }

    pub fn get_str(&self, name: &str) -> Result<Option<&str>> {
        self.get(name).map(Value::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Result<Option<i64>> {
        self.get(name).map(Value::as_i64)
    }

    /// Field names in select-list order.
    pub fn columns(&self) -> Vec<&str> {
        self.fields.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn into_map(self) -> HashMap<String, Value> {
        self.fields.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct IdColumn;
    struct MissingColumn;

    impl Column for IdColumn {
        fn column_name(&self) -> &'static str {
            "id"
        }
        fn table_name(&self) -> &'static str {
            "users"
        }
    }

    impl Column for MissingColumn {
        fn column_name(&self) -> &'static str {
            "missing"
        }
        fn table_name(&self) -> &'static str {
            "users"
        }
    }

    #[test]
    fn test_record_maps_positions_to_names() {
        let order = FieldOrder::new(vec!["name".to_string(), "years".to_string()]);
        let row = order
            .record(vec![Value::from("Alice"), Value::Integer(30)])
            .unwrap();

        assert_eq!(row.get("name").unwrap(), &Value::from("Alice"));
        assert_eq!(row.get_i64("years").unwrap(), Some(30));
        assert_eq!(row.columns(), vec!["name", "years"]);
        assert!(row.get("age").is_err());
    }

    #[test]
    fn test_record_key_uses_trailing_alias() {
        let order = FieldOrder::new(vec!["COUNT(id) AS total".to_string()]);
        let row = order.record(vec![Value::Integer(4)]).unwrap();
        assert_eq!(row.get_i64("total").unwrap(), Some(4));
    }

    #[test]
    fn test_split_alias() {
        assert_eq!(split_alias("age AS years"), Some(("age", "years")));
        assert_eq!(split_alias("age as years"), Some(("age", "years")));
        assert_eq!(split_alias("u.age years"), Some(("u.age", "years")));
        assert_eq!(split_alias("COUNT(id)  AS  total"), Some(("COUNT(id)", "total")));
        assert_eq!(split_alias("name"), None);
        assert_eq!(split_alias("SUM(a + b)"), None);
    }

    #[test]
    fn test_record_rejects_width_mismatch() {
        let order = FieldOrder::new(vec!["a".to_string(), "b".to_string()]);
        let err = order.record(vec![Value::Integer(1)]).unwrap_err();
        match err {
            RedisqlError::RowShapeMismatch { expected, actual } => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            _ => panic!("Expected RowShapeMismatch error"),
        }
    }

    #[test]
    fn test_get_column_falls_back_to_qualified_name() {
        let order = FieldOrder::new(vec!["users.id".to_string()]);
        let row = order.record(vec![Value::Integer(7)]).unwrap();
        assert_eq!(row.get_column(&IdColumn).unwrap(), &Value::Integer(7));
        assert!(matches!(
            row.get_column(&MissingColumn),
            Err(RedisqlError::ColumnNotFound(name)) if name == "users.missing"
        ));
    }
}
