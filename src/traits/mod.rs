mod column;
mod connection;
mod hydrate;
mod table;

pub use column::Column;
pub use connection::{BackendConnection, ConnectionGuard, ConnectionPool};
pub use hydrate::FromRow;
pub use table::Table;
