//! Store layer - connection pool and statement execution
//!
//! # Design Principles
//!
//! - One pooled connection per statement, released on drop on every exit path
//! - Every mutation is a single autocommitted statement, no transactions
//! - No retries: a failed acquire or statement is surfaced immediately

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::Task;
use crate::statement::Statement;

pub mod memory;
pub mod migrations;
pub mod pool;

pub use memory::MemoryStore;
pub use pool::TaskPool;

/// Executes built statements against a data store.
///
/// Injected into the resolvers so tests can substitute [`MemoryStore`].
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Run a row-producing statement and shape every returned row.
    async fn fetch(&self, stmt: &Statement) -> Result<Vec<Task>, StoreError>;

    /// Run a statement for its effect, returning rows affected.
    async fn execute(&self, stmt: &Statement) -> Result<u64, StoreError>;
}
