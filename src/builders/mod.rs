mod select;
mod select_list;
mod write;

pub use select::{BuiltQuery, Order, SelectQuery};
pub use select_list::{normalize, Expression, SelectItem};
pub use write::{DeleteQuery, InsertQuery, UpdateQuery};
