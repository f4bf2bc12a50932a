use crate::types::SqlValue;

/// Parameters bound to one statement.
/// A statement uses either named placeholders or positional `?` marks, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    /// Placeholder token -> value, in binding order. Query builders produce
    /// `?1`, `?2`, ... tokens here.
    Named(Vec<(String, SqlValue)>),
    /// Values for bare `?` marks, in order.
    Positional(Vec<SqlValue>),
}

impl Params {
    pub fn named<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, SqlValue)>,
        K: Into<String>,
    {
        Params::Named(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn positional(values: impl Into<Vec<SqlValue>>) -> Self {
        Params::Positional(values.into())
    }

    /// Binds a value and returns the placeholder to splice into the SQL.
    /// Placeholders are numbered from the current parameter count, so
    /// nested builders sharing one `Params` never collide.
    pub fn bind(&mut self, value: SqlValue) -> String {
        let placeholder = format!("?{}", self.len() + 1);
        match self {
            Params::Named(pairs) => pairs.push((placeholder.clone(), value)),
            Params::Positional(values) => values.push(value),
        }
        placeholder
    }

    pub fn len(&self) -> usize {
        match self {
            Params::Named(pairs) => pairs.len(),
            Params::Positional(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values in binding order. Names are dropped; the order must match the
    /// placeholder positions encoded in the template.
    pub fn values(&self) -> Vec<&SqlValue> {
        match self {
            Params::Named(pairs) => pairs.iter().map(|(_, v)| v).collect(),
            Params::Positional(values) => values.iter().collect(),
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Params::Named(Vec::new())
    }
}

impl From<()> for Params {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<Vec<SqlValue>> for Params {
    fn from(values: Vec<SqlValue>) -> Self {
        Params::Positional(values)
    }
}

impl<const N: usize> From<[SqlValue; N]> for Params {
    fn from(values: [SqlValue; N]) -> Self {
        Params::Positional(values.into())
    }
}

impl From<Vec<(String, SqlValue)>> for Params {
    fn from(pairs: Vec<(String, SqlValue)>) -> Self {
        Params::Named(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_numbers_placeholders() {
        let mut params = Params::default();
        assert_eq!(params.bind("a".into()), "?1");
        assert_eq!(params.bind(2.into()), "?2");
        assert_eq!(
            params,
            Params::named([("?1", SqlValue::from("a")), ("?2", SqlValue::from(2))])
        );
    }

    #[test]
    fn test_values_drop_names_and_keep_order() {
        let params = Params::named([("?2", SqlValue::from(2)), ("?1", SqlValue::from(1))]);
        let values: Vec<SqlValue> = params.values().into_iter().cloned().collect();
        assert_eq!(values, vec![SqlValue::Int(2), SqlValue::Int(1)]);
    }
}
