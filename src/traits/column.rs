use crate::builders::SelectItem;

/// Trait representing a column of a backend table.
/// Implementations are typically generated alongside a `Table`.
pub trait Column {
    /// Returns the column name as it appears in the table.
    fn column_name(&self) -> &'static str;

    /// Returns the table name this column belongs to.
    fn table_name(&self) -> &'static str;

    /// Returns the fully qualified column name (table.column).
    fn qualified_name(&self) -> String {
        format!("{}.{}", self.table_name(), self.column_name())
    }

    /// Select-list entry for this column, aliased to its bare name so the
    /// rebuilt record is keyed by `column_name()`.
    fn select_item(&self) -> SelectItem {
        SelectItem::aliased(self.qualified_name(), self.column_name())
    }
}
