/// Represents a bound SQL parameter value.
/// Only scalars travel to the backend; structured values must be serialized
/// to text by the caller before binding.
///
/// `Null` has no text form on the wire; see [`SqlValue::to_arg`].
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl SqlValue {
    /// Encodes the value as a single RPC argument.
    /// The backend binds every argument from text, so booleans travel as 1/0
    /// and NULL as an empty argument.
    ///
    /// The backend cannot tell that empty argument from `''`: a bound NULL
    /// is stored as an empty string. Write a literal `NULL` into the SQL
    /// instead, as the insert and update builders do.
    pub fn to_arg(&self) -> String {
        match self {
            SqlValue::Null => String::new(),
            SqlValue::Text(s) => s.clone(),
            SqlValue::Int(i) => i.to_string(),
            SqlValue::Float(f) => f.to_string(),
            SqlValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        }
    }

    /// Literal-ish text for diagnostics. Strings are NOT quoted or escaped.
    pub fn to_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Text(s) => s.clone(),
            SqlValue::Int(i) => i.to_string(),
            SqlValue::Float(f) => f.to_string(),
            SqlValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value.into())
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        SqlValue::Int(value.into())
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_rendering() {
        assert_eq!(SqlValue::Null.to_literal(), "NULL");
        assert_eq!(SqlValue::Bool(true).to_literal(), "TRUE");
        assert_eq!(SqlValue::Bool(false).to_literal(), "FALSE");
        assert_eq!(SqlValue::from("it's").to_literal(), "it's");
        assert_eq!(SqlValue::from(5).to_literal(), "5");
    }

    #[test]
    fn test_arg_encoding() {
        assert_eq!(SqlValue::Bool(true).to_arg(), "1");
        assert_eq!(SqlValue::Null.to_arg(), "");
        assert_eq!(SqlValue::from(2.5).to_arg(), "2.5");
        assert_eq!(SqlValue::from(None::<i64>), SqlValue::Null);
    }
}
