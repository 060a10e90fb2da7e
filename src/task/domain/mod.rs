//! Domain model for the task lifecycle.
//!
//! Tasks belong to a project and move through the project's status pipeline.
//! The status policy in [`policy`] decides which proposed changes are legal
//! and which statuses are forced, and reports every accepted change as a
//! [`TaskChange`] for the automation engine to react to.

mod error;
mod ids;
pub mod policy;
mod project;
mod status;
mod task;

pub use error::TaskDomainError;
pub use ids::{ProjectId, TaskId};
pub use policy::{
    FieldPatch, TaskChange, TaskDraft, TaskPatch, ValidatedCreation, ValidatedUpdate,
};
pub use project::{PersistedProjectData, Project};
pub use status::{StatusPipeline, TaskStatus};
pub use task::{Comment, PersistedTaskData, Task};
