//! In-process task store
//!
//! Executes built statements by their [`StatementKind`] against a table held
//! in memory, with the same defaults and constraints as the `tasks` table.
//! Used by tests and by the server's `--memory` mode.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::TaskStore;
use crate::error::StoreError;
use crate::models::{Task, TaskId};
use crate::statement::{Column, SqlParam, Statement, StatementKind};

/// Status assigned to new rows, mirroring the column default.
pub const DEFAULT_STATUS: &str = "pending";

#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<Task>>,
    fail_next: Mutex<Option<StoreError>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next statement fail with `err` without touching any row.
    pub async fn fail_next(&self, err: StoreError) {
        *self.fail_next.lock().await = Some(err);
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    async fn take_failure(&self) -> Result<(), StoreError> {
        match self.fail_next.lock().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn run(&self, stmt: &Statement) -> Result<(Vec<Task>, u64), StoreError> {
        self.take_failure().await?;

        match &stmt.kind {
            StatementKind::ListAll => {
                let rows = self.rows.read().await.clone();
                let count = rows.len() as u64;
                Ok((rows, count))
            }
            StatementKind::GetById => {
                let id = id_param(stmt, 0)?;
                let rows: Vec<Task> = self
                    .rows
                    .read()
                    .await
                    .iter()
                    .filter(|t| t.id == id)
                    .cloned()
                    .collect();
                let count = rows.len() as u64;
                Ok((rows, count))
            }
            StatementKind::Insert => {
                let title = match param(stmt, 0)? {
                    SqlParam::Text(title) => title.clone(),
                    _ => return Err(not_null(Column::Title)),
                };
                let description = optional_text(param(stmt, 1)?)?;
                let task = Task {
                    id: TaskId::new(Uuid::new_v4()),
                    title,
                    description,
                    status: DEFAULT_STATUS.to_string(),
                    created_at: Utc::now(),
                };
                self.rows.write().await.push(task.clone());
                Ok((vec![task], 1))
            }
            StatementKind::PartialUpdate { columns } => {
                let id = id_param(stmt, 0)?;
                let mut rows = self.rows.write().await;
                let Some(row) = rows.iter_mut().find(|t| t.id == id) else {
                    return Ok((Vec::new(), 0));
                };

                // Apply to a copy so a constraint failure leaves the row untouched
                let mut updated = row.clone();
                for (i, column) in columns.iter().enumerate() {
                    let value = optional_text(param(stmt, i + 1)?)?;
                    match (column, value) {
                        (Column::Title, Some(v)) => updated.title = v,
                        (Column::Status, Some(v)) => updated.status = v,
                        (Column::Description, v) => updated.description = v,
                        (column, None) => return Err(not_null(*column)),
                    }
                }
                *row = updated.clone();
                Ok((vec![updated], 1))
            }
            StatementKind::DeleteById => {
                let id = id_param(stmt, 0)?;
                let mut rows = self.rows.write().await;
                let before = rows.len();
                rows.retain(|t| t.id != id);
                Ok((Vec::new(), (before - rows.len()) as u64))
            }
        }
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn fetch(&self, stmt: &Statement) -> Result<Vec<Task>, StoreError> {
        self.run(stmt).await.map(|(rows, _)| rows)
    }

    async fn execute(&self, stmt: &Statement) -> Result<u64, StoreError> {
        self.run(stmt).await.map(|(_, affected)| affected)
    }
}

fn param(stmt: &Statement, index: usize) -> Result<&SqlParam, StoreError> {
    stmt.params.get(index).ok_or_else(|| {
        StoreError::Statement(format!(
            "bind message supplies {} parameters, but statement requires more",
            stmt.params.len()
        ))
    })
}

fn id_param(stmt: &Statement, index: usize) -> Result<TaskId, StoreError> {
    match param(stmt, index)? {
        SqlParam::Id(id) => Ok(TaskId::new(*id)),
        other => Err(StoreError::Statement(format!(
            "invalid input syntax for type uuid: {:?}",
            other
        ))),
    }
}

fn optional_text(param: &SqlParam) -> Result<Option<String>, StoreError> {
    match param {
        SqlParam::Text(text) => Ok(Some(text.clone())),
        SqlParam::Null => Ok(None),
        SqlParam::Id(id) => Err(StoreError::Statement(format!(
            "column is of type text but expression is of type uuid: {}",
            id
        ))),
    }
}

fn not_null(column: Column) -> StoreError {
    StoreError::Statement(format!(
        "null value in column \"{}\" of relation \"tasks\" violates not-null constraint",
        column.as_str()
    ))
}
