//! Repository port for task persistence and lookup.

use crate::task::domain::{ProjectId, Task, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists or [`TaskRepositoryError::DuplicateTitle`] when the project
    /// already has a task with the same title.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// or [`TaskRepositoryError::DuplicateTitle`] when a renamed task collides
    /// with another task in the project.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns all tasks of a project in creation order.
    async fn find_by_project(&self, project: ProjectId) -> TaskRepositoryResult<Vec<Task>>;

    /// Finds the task in `project` with exactly the given trimmed title.
    async fn find_by_project_and_title(
        &self,
        project: ProjectId,
        title: &str,
    ) -> TaskRepositoryResult<Option<Task>>;

    /// Returns tasks whose due date is before `now` and whose status is not
    /// "Done".
    async fn find_overdue_open(&self, now: DateTime<Utc>) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// Another task in the project has the same title.
    #[error("duplicate task title '{title}' in project {project}")]
    DuplicateTitle {
        /// Owning project.
        project: ProjectId,
        /// Conflicting title.
        title: String,
    },

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
