//! Resolver set - one resolver per schema operation
//!
//! Each call moves through validate → build statement → execute → shape.
//! Validation failures return before the store is touched; store failures
//! are surfaced unchanged.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{StoreError, TaskResult};
use crate::models::{
    CreateTaskArgs, FieldUpdate, Task, TaskId, TaskStatus, TaskTitle, UpdateTaskArgs,
    ValidationError,
};
use crate::statement;
use crate::store::TaskStore;

/// Resolvers bound to an injected store
#[derive(Clone)]
pub struct TaskResolvers {
    store: Arc<dyn TaskStore>,
}

impl TaskResolvers {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// All tasks in the store's natural row order.
    #[tracing::instrument(name = "tasks", skip(self))]
    pub async fn tasks(&self) -> TaskResult<Vec<Task>> {
        let rows = self.store.fetch(&statement::list_all()).await?;
        debug!(count = rows.len(), "shaped");
        Ok(rows)
    }

    /// A single task, or `None` when no row has this id.
    #[tracing::instrument(name = "task", skip(self))]
    pub async fn task(&self, id: &str) -> TaskResult<Option<Task>> {
        let id = TaskId::parse(id)?;
        let row = self
            .store
            .fetch(&statement::get_by_id(id))
            .await?
            .into_iter()
            .next();
        debug!(found = row.is_some(), "shaped");
        Ok(row)
    }

    #[tracing::instrument(name = "createTask", skip(self, args))]
    pub async fn create_task(&self, args: CreateTaskArgs) -> TaskResult<Task> {
        let title = TaskTitle::new(args.title.as_deref().unwrap_or_default())?;
        debug!("validated");

        let stmt = statement::insert(title.as_str(), args.description.as_deref());
        let task = self
            .store
            .fetch(&stmt)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Statement("insert returned no row".into()))?;

        debug!(id = %task.id, "created");
        Ok(task)
    }

    /// Partial update; `None` when no row has this id.
    ///
    /// Omitted fields are left untouched. An explicit null clears
    /// `description`; `title` and `status` are not nullable.
    #[tracing::instrument(name = "updateTask", skip(self, args), fields(id = %args.id))]
    pub async fn update_task(&self, args: UpdateTaskArgs) -> TaskResult<Option<Task>> {
        let id = TaskId::parse(&args.id)?;
        let title = required_update(args.title, "title", |t| {
            TaskTitle::new(t).map(TaskTitle::into_string)
        })?;
        let status = required_update(args.status, "status", |s| {
            TaskStatus::new(s).map(TaskStatus::into_string)
        })?;
        debug!("validated");

        let stmt = statement::partial_update(
            id,
            title.as_deref(),
            args.description.as_deref(),
            status.as_deref(),
        );
        let row = self.store.fetch(&stmt).await?.into_iter().next();

        debug!(found = row.is_some(), "shaped");
        Ok(row)
    }

    /// Delete by id, confirming with a message that names the id.
    ///
    /// The confirmation is returned whether or not a row existed.
    #[tracing::instrument(name = "deleteTask", skip(self))]
    pub async fn delete_task(&self, id: &str) -> TaskResult<String> {
        let id = TaskId::parse(id)?;
        let affected = self.store.execute(&statement::delete_by_id(id)).await?;
        if affected == 0 {
            warn!(%id, "deleteTask matched no row");
        }
        Ok(format!("Task with ID {} deleted successfully", id))
    }
}

/// Validate an update of a non-nullable column.
fn required_update<F>(
    update: FieldUpdate<String>,
    field: &'static str,
    validate: F,
) -> Result<FieldUpdate<String>, ValidationError>
where
    F: FnOnce(&str) -> Result<String, ValidationError>,
{
    match update {
        FieldUpdate::Keep => Ok(FieldUpdate::Keep),
        FieldUpdate::Clear => Err(ValidationError::NotNullable { field }),
        FieldUpdate::Set(v) => validate(&v).map(FieldUpdate::Set),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::store::MemoryStore;

    fn setup() -> (Arc<MemoryStore>, TaskResolvers) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), TaskResolvers::new(store))
    }

    fn create(title: &str, description: Option<&str>) -> CreateTaskArgs {
        CreateTaskArgs {
            title: Some(title.to_string()),
            description: description.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn create_update_delete_scenario() {
        let (_, resolvers) = setup();

        let task = resolvers
            .create_task(create("Write spec", Some("draft")))
            .await
            .unwrap();
        assert!(!task.id.to_string().is_empty());
        assert_eq!(task.status, "pending");
        assert_eq!(task.description.as_deref(), Some("draft"));

        let mut args = UpdateTaskArgs::new(task.id.to_string());
        args.status = FieldUpdate::Set("done".into());
        let updated = resolvers.update_task(args).await.unwrap().unwrap();
        assert_eq!(updated.title, "Write spec");
        assert_eq!(updated.description.as_deref(), Some("draft"));
        assert_eq!(updated.status, "done");
        assert_eq!(updated.created_at, task.created_at);

        let message = resolvers.delete_task(&task.id.to_string()).await.unwrap();
        assert!(message.contains(&task.id.to_string()));
        assert_eq!(resolvers.task(&task.id.to_string()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_title_rejected_before_store_access() {
        let (store, resolvers) = setup();

        for args in [CreateTaskArgs::default(), create("   ", None)] {
            let err = resolvers.create_task(args).await.unwrap_err();
            assert!(matches!(
                err,
                TaskError::Validation(ValidationError::Empty { field: "title" })
            ));
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn missing_task_is_none_not_error() {
        let (_, resolvers) = setup();
        let id = TaskId::new(uuid::Uuid::new_v4()).to_string();

        assert_eq!(resolvers.task(&id).await.unwrap(), None);
        assert_eq!(
            resolvers.update_task(UpdateTaskArgs::new(id)).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn malformed_id_is_validation_error() {
        let (_, resolvers) = setup();
        assert!(matches!(
            resolvers.task("42").await.unwrap_err(),
            TaskError::Validation(ValidationError::InvalidFormat { field: "id", .. })
        ));
        assert!(matches!(
            resolvers.delete_task("").await.unwrap_err(),
            TaskError::Validation(ValidationError::Empty { field: "id" })
        ));
    }

    #[tokio::test]
    async fn update_without_fields_returns_current_row() {
        let (_, resolvers) = setup();
        let task = resolvers.create_task(create("same", Some("d"))).await.unwrap();

        let updated = resolvers
            .update_task(UpdateTaskArgs::new(task.id.to_string()))
            .await
            .unwrap();
        assert_eq!(updated, Some(task));
    }

    #[tokio::test]
    async fn explicit_null_clears_description_but_omission_keeps_it() {
        let (_, resolvers) = setup();
        let task = resolvers.create_task(create("t", Some("d"))).await.unwrap();

        let mut keep = UpdateTaskArgs::new(task.id.to_string());
        keep.title = FieldUpdate::Set("t2".into());
        let kept = resolvers.update_task(keep).await.unwrap().unwrap();
        assert_eq!(kept.title, "t2");
        assert_eq!(kept.description.as_deref(), Some("d"));

        let mut clear = UpdateTaskArgs::new(task.id.to_string());
        clear.description = FieldUpdate::Clear;
        let cleared = resolvers.update_task(clear).await.unwrap().unwrap();
        assert_eq!(cleared.description, None);
        assert_eq!(cleared.title, "t2");
    }

    #[tokio::test]
    async fn empty_description_is_distinct_from_absent() {
        let (_, resolvers) = setup();
        let task = resolvers.create_task(create("t", Some(""))).await.unwrap();
        assert_eq!(task.description.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn null_title_or_status_rejected_before_store_access() {
        let (store, resolvers) = setup();
        let task = resolvers.create_task(create("t", None)).await.unwrap();
        store.fail_next(StoreError::PoolExhausted).await;

        let mut args = UpdateTaskArgs::new(task.id.to_string());
        args.title = FieldUpdate::Clear;
        assert!(matches!(
            resolvers.update_task(args).await.unwrap_err(),
            TaskError::Validation(ValidationError::NotNullable { field: "title" })
        ));

        let mut args = UpdateTaskArgs::new(task.id.to_string());
        args.status = FieldUpdate::Clear;
        assert!(matches!(
            resolvers.update_task(args).await.unwrap_err(),
            TaskError::Validation(ValidationError::NotNullable { field: "status" })
        ));

        // The injected failure is still pending: validation never reached the store
        assert!(resolvers.tasks().await.is_err());
    }

    #[tokio::test]
    async fn store_errors_surface_verbatim() {
        let (store, resolvers) = setup();
        store
            .fail_next(StoreError::Statement("relation \"tasks\" does not exist".into()))
            .await;

        let err = resolvers.tasks().await.unwrap_err();
        assert_eq!(err.to_string(), "relation \"tasks\" does not exist");
        assert_eq!(err.code(), "STORE_ERROR");
    }

    // Known permissive behavior: deleting a nonexistent task still confirms.
    #[tokio::test]
    async fn delete_of_missing_task_still_confirms() {
        let (_, resolvers) = setup();
        let id = TaskId::new(uuid::Uuid::new_v4()).to_string();

        let message = resolvers.delete_task(&id).await.unwrap();
        assert_eq!(message, format!("Task with ID {} deleted successfully", id));
    }

    #[tokio::test]
    async fn tasks_lists_every_row() {
        let (_, resolvers) = setup();
        assert!(resolvers.tasks().await.unwrap().is_empty());

        let a = resolvers.create_task(create("a", None)).await.unwrap();
        let b = resolvers.create_task(create("b", None)).await.unwrap();
        assert_eq!(resolvers.tasks().await.unwrap(), vec![a, b]);
    }
}
