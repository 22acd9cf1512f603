//! GraphQL schema definition
//!
//! Declares the `Task` type and the five operations, and binds each
//! operation to the matching resolver in [`TaskResolvers`]. Request
//! validation against these types is done by async-graphql before any
//! resolver runs.

use async_graphql::{
    Context, EmptySubscription, Error, ErrorExtensions, MaybeUndefined, Object, Result, Schema,
    SimpleObject, ID,
};
use taskql_core::{CreateTaskArgs, FieldUpdate, Task, TaskError, TaskResolvers, UpdateTaskArgs};

pub type TaskSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// A titled, optionally described, status-bearing record
#[derive(SimpleObject, Debug, Clone, PartialEq)]
#[graphql(name = "Task")]
pub struct TaskObject {
    pub id: ID,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    /// RFC 3339 creation timestamp
    #[graphql(name = "created_at")]
    pub created_at: String,
}

impl From<Task> for TaskObject {
    fn from(task: Task) -> Self {
        Self {
            id: ID(task.id.to_string()),
            title: task.title,
            description: task.description,
            status: task.status,
            created_at: task.created_at.to_rfc3339(),
        }
    }
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Get all tasks
    async fn tasks(&self, ctx: &Context<'_>) -> Result<Vec<TaskObject>> {
        let resolvers = ctx.data::<TaskResolvers>()?;
        let tasks = resolvers.tasks().await.map_err(into_graphql_error)?;
        Ok(tasks.into_iter().map(TaskObject::from).collect())
    }

    /// Get a specific task by ID, or null if it doesn't exist
    async fn task(&self, ctx: &Context<'_>, id: ID) -> Result<Option<TaskObject>> {
        let resolvers = ctx.data::<TaskResolvers>()?;
        let task = resolvers.task(&id).await.map_err(into_graphql_error)?;
        Ok(task.map(TaskObject::from))
    }
}

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create a new task
    async fn create_task(
        &self,
        ctx: &Context<'_>,
        title: String,
        description: Option<String>,
    ) -> Result<TaskObject> {
        let resolvers = ctx.data::<TaskResolvers>()?;
        let args = CreateTaskArgs {
            title: Some(title),
            description,
        };
        let task = resolvers.create_task(args).await.map_err(into_graphql_error)?;
        Ok(TaskObject::from(task))
    }

    /// Update only the supplied fields of a task; null if it doesn't exist.
    ///
    /// An explicit `description: null` clears the description.
    async fn update_task(
        &self,
        ctx: &Context<'_>,
        id: ID,
        title: MaybeUndefined<String>,
        description: MaybeUndefined<String>,
        status: MaybeUndefined<String>,
    ) -> Result<Option<TaskObject>> {
        let resolvers = ctx.data::<TaskResolvers>()?;
        let args = UpdateTaskArgs {
            id: id.0,
            title: field_update(title),
            description: field_update(description),
            status: field_update(status),
        };
        let task = resolvers.update_task(args).await.map_err(into_graphql_error)?;
        Ok(task.map(TaskObject::from))
    }

    /// Delete a task
    async fn delete_task(&self, ctx: &Context<'_>, id: ID) -> Result<String> {
        let resolvers = ctx.data::<TaskResolvers>()?;
        resolvers.delete_task(&id).await.map_err(into_graphql_error)
    }
}

fn field_update<T>(value: MaybeUndefined<T>) -> FieldUpdate<T> {
    match value {
        MaybeUndefined::Undefined => FieldUpdate::Keep,
        MaybeUndefined::Null => FieldUpdate::Clear,
        MaybeUndefined::Value(v) => FieldUpdate::Set(v),
    }
}

/// Convert a resolver error into a GraphQL error with an `extensions.code`.
pub fn into_graphql_error(err: TaskError) -> Error {
    let code = err.code();
    match &err {
        TaskError::Validation(e) => {
            let field = e.field();
            Error::new(err.to_string()).extend_with(|_, ext| {
                ext.set("code", code);
                ext.set("field", field);
            })
        }
        TaskError::Store(e) => {
            tracing::error!(error = %e, code, "store error");
            Error::new(err.to_string()).extend_with(|_, ext| ext.set("code", code))
        }
    }
}

/// Schema construction options
#[derive(Debug, Clone, Copy)]
pub struct SchemaOptions {
    pub introspection: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self { introspection: true }
    }
}

/// Build the executable schema with the resolvers injected as context data.
pub fn build_schema(resolvers: TaskResolvers, options: SchemaOptions) -> TaskSchema {
    let builder = Schema::build(QueryRoot, MutationRoot, EmptySubscription).data(resolvers);
    if options.introspection {
        builder.finish()
    } else {
        builder.disable_introspection().finish()
    }
}

/// The schema in SDL form
pub fn schema_sdl() -> String {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .finish()
        .sdl()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};
    use taskql_core::{MemoryStore, StoreError};

    use super::*;

    fn schema() -> (Arc<MemoryStore>, TaskSchema) {
        let store = Arc::new(MemoryStore::new());
        let resolvers = TaskResolvers::new(store.clone());
        (store, build_schema(resolvers, SchemaOptions::default()))
    }

    async fn run(schema: &TaskSchema, query: &str) -> Value {
        let response = schema.execute(query).await;
        serde_json::to_value(&response).unwrap()
    }

    async fn create(schema: &TaskSchema, title: &str, description: &str) -> Value {
        let query = format!(
            r#"mutation {{ createTask(title: "{}", description: "{}") {{ id title description status created_at }} }}"#,
            title, description
        );
        let body = run(schema, &query).await;
        assert!(body.get("errors").is_none(), "unexpected errors: {}", body);
        body["data"]["createTask"].clone()
    }

    #[tokio::test]
    async fn create_update_delete_scenario() {
        let (_, schema) = schema();

        let task = create(&schema, "Write spec", "draft").await;
        let id = task["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());
        assert_eq!(task["status"], "pending");
        assert!(task["created_at"].as_str().is_some());

        let body = run(
            &schema,
            &format!(r#"mutation {{ updateTask(id: "{}", status: "done") {{ title description status }} }}"#, id),
        )
        .await;
        assert_eq!(
            body["data"]["updateTask"],
            json!({ "title": "Write spec", "description": "draft", "status": "done" })
        );

        let body = run(&schema, &format!(r#"mutation {{ deleteTask(id: "{}") }}"#, id)).await;
        assert!(body["data"]["deleteTask"].as_str().unwrap().contains(&id));

        let body = run(&schema, &format!(r#"{{ task(id: "{}") {{ id }} }}"#, id)).await;
        assert_eq!(body, json!({ "data": { "task": null } }));
    }

    #[tokio::test]
    async fn omitted_description_is_kept_and_null_clears() {
        let (_, schema) = schema();
        let task = create(&schema, "t", "d").await;
        let id = task["id"].as_str().unwrap();

        let body = run(
            &schema,
            &format!(r#"mutation {{ updateTask(id: "{}", title: "t2") {{ title description }} }}"#, id),
        )
        .await;
        assert_eq!(body["data"]["updateTask"], json!({ "title": "t2", "description": "d" }));

        let body = run(
            &schema,
            &format!(r#"mutation {{ updateTask(id: "{}", description: null) {{ title description }} }}"#, id),
        )
        .await;
        assert_eq!(body["data"]["updateTask"], json!({ "title": "t2", "description": null }));
    }

    #[tokio::test]
    async fn update_of_missing_task_is_null() {
        let (_, schema) = schema();
        let body = run(
            &schema,
            r#"mutation { updateTask(id: "67e55044-10b1-426f-9247-bb680e5fe0c8", status: "done") { id } }"#,
        )
        .await;
        assert_eq!(body, json!({ "data": { "updateTask": null } }));
    }

    #[tokio::test]
    async fn empty_title_is_validation_error() {
        let (store, schema) = schema();
        let body = run(&schema, r#"mutation { createTask(title: "") { id } }"#).await;

        let error = &body["errors"][0];
        assert_eq!(error["extensions"]["code"], "VALIDATION_FAILED");
        assert_eq!(error["extensions"]["field"], "title");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn missing_required_argument_rejected_by_engine() {
        let (_, schema) = schema();
        let body = run(&schema, r#"mutation { createTask(description: "x") { id } }"#).await;
        assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn null_status_is_validation_error() {
        let (_, schema) = schema();
        let task = create(&schema, "t", "d").await;
        let body = run(
            &schema,
            &format!(r#"mutation {{ updateTask(id: "{}", status: null) {{ id }} }}"#, task["id"].as_str().unwrap()),
        )
        .await;
        assert_eq!(body["errors"][0]["extensions"]["field"], "status");
    }

    #[tokio::test]
    async fn store_error_message_passes_through() {
        let (store, schema) = schema();
        store.fail_next(StoreError::PoolExhausted).await;

        let body = run(&schema, "{ tasks { id } }").await;
        let error = &body["errors"][0];
        assert_eq!(error["message"], "connection pool exhausted");
        assert_eq!(error["extensions"]["code"], "POOL_EXHAUSTED");
    }

    #[tokio::test]
    async fn tasks_lists_created_rows() {
        let (_, schema) = schema();
        create(&schema, "a", "").await;
        create(&schema, "b", "").await;

        let body = run(&schema, "{ tasks { title description } }").await;
        assert_eq!(
            body["data"]["tasks"],
            json!([
                { "title": "a", "description": "" },
                { "title": "b", "description": "" },
            ])
        );
    }

    #[tokio::test]
    async fn introspection_can_be_disabled() {
        let resolvers = TaskResolvers::new(Arc::new(MemoryStore::new()));
        let schema = build_schema(resolvers, SchemaOptions { introspection: false });

        let body = run(&schema, "{ __schema { queryType { name } } }").await;
        assert_ne!(body["data"]["__schema"]["queryType"]["name"], "QueryRoot");
    }

    #[test]
    fn sdl_declares_operations() {
        let sdl = schema_sdl();
        assert!(sdl.contains("created_at: String!"));
        assert!(sdl.contains("type Task"));
        for operation in ["tasks", "task(", "createTask(", "updateTask(", "deleteTask("] {
            assert!(sdl.contains(operation), "missing {}", operation);
        }
    }
}
