//! Domain models with validation at construction
//!
//! All client input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod fields;
pub mod task;
pub mod validation;

pub use fields::{TaskStatus, TaskTitle};
pub use task::{CreateTaskArgs, FieldUpdate, Task, TaskId, UpdateTaskArgs};
pub use validation::ValidationError;
