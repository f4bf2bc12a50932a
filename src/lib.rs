//! redisql-rs - A query builder and driver for the RediSQL backend
//!
//! RediSQL answers queries with bare positional tuples. The field order of
//! every select list is captured when the query is built and travels with
//! the command, so rows come back as named records.
//!
//! # Example
//! ```ignore
//! use redisql_rs::{RedisqlClient, SelectQuery, WhereClause};
//!
//! // Connect to the backend; the database name comes from the address
//! let client = RedisqlClient::connect("redis://localhost:6379/?dbname=app").await?;
//! let querier = client.querier();
//!
//! // Execute a SELECT query
//! let row = SelectQuery::new()
//!     .select(["id", "name AS who"])
//!     .from("users")
//!     .where_(WhereClause::eq("name", "John"))
//!     .one(&querier)
//!     .await?
//!     .expect("user exists");
//!
//! let id = row.get("id")?;
//! let who = row.get("who")?;
//! ```

pub mod builders;
pub mod clauses;
pub mod command;
pub mod config;
pub mod drivers;
pub mod error;
pub mod querier;
pub mod traits;
pub mod types;

mod client;

// Re-export main types for convenient access
pub use builders::{Expression, Order, SelectItem, SelectQuery};
pub use clauses::WhereClause;
pub use client::RedisqlClient;
pub use command::{Command, FetchMode};
pub use config::{ClientOptions, ConnectionConfig};
pub use error::{RedisqlError, Result};
pub use querier::Querier;
pub use traits::{Column, FromRow, Table};
pub use types::{FieldOrder, Params, Row, SqlValue, Value};
