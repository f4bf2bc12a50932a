mod params;
mod reply;
mod row;
mod sql_value;

pub use params::Params;
pub use reply::{RawResult, Reply, Value};
pub(crate) use row::split_alias;
pub use row::{FieldOrder, Row};
pub use sql_value::SqlValue;
