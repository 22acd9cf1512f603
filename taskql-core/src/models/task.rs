//! Task record and per-operation argument types

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::ValidationError;

/// Store-assigned task identifier (opaque to clients)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse a client-supplied id.
    ///
    /// # Example
    /// ```
    /// use taskql_core::models::TaskId;
    ///
    /// assert!(TaskId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").is_ok());
    /// assert!(TaskId::parse("42").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "id" });
        }
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| ValidationError::InvalidFormat {
                field: "id",
                reason: e.to_string(),
            })
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A row of the `tasks` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// One optional argument of a partial update.
///
/// `Keep` is an omitted argument, `Clear` an explicit null.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> FieldUpdate<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldUpdate<U> {
        match self {
            Self::Keep => FieldUpdate::Keep,
            Self::Clear => FieldUpdate::Clear,
            Self::Set(v) => FieldUpdate::Set(f(v)),
        }
    }
}

impl<T: Deref> FieldUpdate<T> {
    pub fn as_deref(&self) -> FieldUpdate<&T::Target> {
        match self {
            Self::Keep => FieldUpdate::Keep,
            Self::Clear => FieldUpdate::Clear,
            Self::Set(v) => FieldUpdate::Set(v.deref()),
        }
    }
}

/// Arguments of `createTask`
#[derive(Debug, Clone, Default)]
pub struct CreateTaskArgs {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Arguments of `updateTask`
#[derive(Debug, Clone)]
pub struct UpdateTaskArgs {
    pub id: String,
    pub title: FieldUpdate<String>,
    pub description: FieldUpdate<String>,
    pub status: FieldUpdate<String>,
}

impl UpdateTaskArgs {
    /// Update with every optional field omitted
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: FieldUpdate::Keep,
            description: FieldUpdate::Keep,
            status: FieldUpdate::Keep,
        }
    }
}
