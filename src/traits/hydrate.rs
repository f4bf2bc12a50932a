use crate::error::Result;
use crate::types::Row;

/// Builds a domain value from a named record.
///
/// Implemented by callers for their own types; the query layer hands it a
/// `Row` whose keys come from the select list.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(row.clone())
    }
}
