//! Error types for task domain validation.

use super::{ProjectId, TaskId};
use thiserror::Error;

/// Errors returned while validating task, project, and status values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task is "Done"; its status cannot change and it cannot be deleted.
    #[error("task {0} is done and can no longer be moved or deleted")]
    DoneTaskImmutable(TaskId),

    /// The status is not part of the project's status pipeline.
    #[error("status '{status}' is not configured for project {project}")]
    InvalidStatus {
        /// Rejected status label.
        status: String,
        /// Project whose pipeline was consulted.
        project: ProjectId,
    },

    /// Another task in the project already uses the title.
    #[error("a task titled '{title}' already exists in project {project}")]
    DuplicateTitle {
        /// Conflicting trimmed title.
        title: String,
        /// Project containing both tasks.
        project: ProjectId,
    },

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The comment text is empty after trimming.
    #[error("comment text must not be empty")]
    EmptyComment,

    /// A status label is empty after trimming.
    #[error("status label must not be empty")]
    EmptyStatusLabel,

    /// A status label appears more than once in a pipeline.
    #[error("status label '{0}' appears more than once")]
    DuplicateStatusLabel(String),

    /// A status pipeline has no labels.
    #[error("status pipeline must contain at least one label")]
    EmptyStatusPipeline,

    /// The project title is empty after trimming.
    #[error("project title must not be empty")]
    EmptyProjectTitle,
}
