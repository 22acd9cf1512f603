//! Statement builder
//!
//! Produces `(sql, params)` pairs for every task operation. Values are
//! never interpolated into the SQL text; they are bound positionally
//! (`$1..$n`) from the ordered `params` list.

use uuid::Uuid;

use crate::models::{FieldUpdate, TaskId};

/// Columns returned by every row-producing statement
const RETURNING: &str = "id, title, description, status, created_at";

/// A bound statement argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Id(Uuid),
    Text(String),
    Null,
}

/// Settable task column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Title,
    Description,
    Status,
}

impl Column {
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Title => "title",
            Column::Description => "description",
            Column::Status => "status",
        }
    }
}

/// Which operation a statement performs.
///
/// Stores that don't speak SQL execute by kind; `params` line up with
/// the kind's arguments in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    ListAll,
    GetById,
    /// params: title, description
    Insert,
    /// params: id, then one value per column in order
    PartialUpdate { columns: Vec<Column> },
    DeleteById,
}

/// SQL text plus its ordered arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    pub sql: String,
    pub params: Vec<SqlParam>,
}

/// `SELECT` every task, in the store's natural order.
pub fn list_all() -> Statement {
    Statement {
        kind: StatementKind::ListAll,
        sql: format!("SELECT {RETURNING} FROM tasks"),
        params: Vec::new(),
    }
}

pub fn get_by_id(id: TaskId) -> Statement {
    Statement {
        kind: StatementKind::GetById,
        sql: format!("SELECT {RETURNING} FROM tasks WHERE id = $1"),
        params: vec![SqlParam::Id(id.as_uuid())],
    }
}

/// Insert a task; an absent description is stored as NULL.
pub fn insert(title: &str, description: Option<&str>) -> Statement {
    Statement {
        kind: StatementKind::Insert,
        sql: format!("INSERT INTO tasks (title, description) VALUES ($1, $2) RETURNING {RETURNING}"),
        params: vec![
            SqlParam::Text(title.to_owned()),
            description.map_or(SqlParam::Null, |d| SqlParam::Text(d.to_owned())),
        ],
    }
}

/// Partial update of the supplied columns.
///
/// `Keep` leaves a column out of the `SET` clause entirely, so an omitted
/// argument can never be confused with an explicit `Clear` (bound NULL).
/// With nothing to set, a no-op `SET id = id` still returns the row.
pub fn partial_update(
    id: TaskId,
    title: FieldUpdate<&str>,
    description: FieldUpdate<&str>,
    status: FieldUpdate<&str>,
) -> Statement {
    let mut columns = Vec::new();
    let mut assignments = Vec::new();
    let mut params = vec![SqlParam::Id(id.as_uuid())];

    for (column, update) in [
        (Column::Title, title),
        (Column::Description, description),
        (Column::Status, status),
    ] {
        let param = match update {
            FieldUpdate::Keep => continue,
            FieldUpdate::Clear => SqlParam::Null,
            FieldUpdate::Set(v) => SqlParam::Text(v.to_owned()),
        };
        params.push(param);
        assignments.push(format!("{} = ${}", column.as_str(), params.len()));
        columns.push(column);
    }

    let set_clause = if assignments.is_empty() {
        "id = id".to_owned()
    } else {
        assignments.join(", ")
    };

    Statement {
        kind: StatementKind::PartialUpdate { columns },
        sql: format!("UPDATE tasks SET {set_clause} WHERE id = $1 RETURNING {RETURNING}"),
        params,
    }
}

pub fn delete_by_id(id: TaskId) -> Statement {
    Statement {
        kind: StatementKind::DeleteById,
        sql: "DELETE FROM tasks WHERE id = $1".to_owned(),
        params: vec![SqlParam::Id(id.as_uuid())],
    }
}
