mod where_clause;

pub use where_clause::WhereClause;
