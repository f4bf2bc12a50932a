/// Trait representing a backend table.
///
/// The backend has no catalog, so `attributes()` is the only place the
/// column list of a table is known. Queries built with `from_table` and no
/// explicit select list select these attributes in this order.
pub trait Table {
    /// The type containing all column accessors for this table.
    type Columns;

    /// Returns the table name as it appears in the database.
    fn table_name() -> &'static str;

    /// Column names in declaration order.
    fn attributes() -> &'static [&'static str];

    /// Returns an instance of the columns accessor for this table.
    fn columns() -> Self::Columns;
}
