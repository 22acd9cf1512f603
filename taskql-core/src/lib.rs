//! taskql-core: task resolvers over a pooled Postgres store
//!
//! Translates typed task operations into parameterized SQL statements,
//! executes them through a connection pool, and shapes rows into
//! [`Task`] records.

pub mod config;
pub mod error;
pub mod models;
pub mod resolvers;
pub mod statement;
pub mod store;

pub use config::StoreConfig;
pub use error::{ConfigError, StoreError, TaskError, TaskResult};
pub use models::{CreateTaskArgs, FieldUpdate, Task, TaskId, UpdateTaskArgs, ValidationError};
pub use resolvers::TaskResolvers;
pub use statement::Statement;
pub use store::{MemoryStore, TaskPool, TaskStore};
