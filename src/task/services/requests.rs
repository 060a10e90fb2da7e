//! Request payloads accepted by the task lifecycle service.

use crate::task::domain::{FieldPatch, TaskDomainError, TaskDraft, TaskPatch, TaskStatus};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskRequest {
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    status: Option<String>,
    assignee: Option<UserId>,
}

impl NewTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
            status: None,
            assignee: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Requests an initial status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the initial assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    pub(super) fn into_draft(self) -> Result<TaskDraft, TaskDomainError> {
        Ok(TaskDraft {
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            status: self.status.map(TaskStatus::new).transpose()?,
            assignee: self.assignee,
        })
    }
}

/// Request payload for updating a task. Fields left unset are unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<FieldPatch<String>>,
    due_date: Option<FieldPatch<DateTime<Utc>>>,
    status: Option<String>,
    assignee: Option<FieldPatch<UserId>>,
}

impl UpdateTaskRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames the task.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(FieldPatch::Set(description.into()));
        self
    }

    /// Removes the description.
    #[must_use]
    pub fn clear_description(mut self) -> Self {
        self.description = Some(FieldPatch::Clear);
        self
    }

    /// Replaces the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(FieldPatch::Set(due_date));
        self
    }

    /// Removes the due date.
    #[must_use]
    pub const fn clear_due_date(mut self) -> Self {
        self.due_date = Some(FieldPatch::Clear);
        self
    }

    /// Requests a status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Assigns the task to `assignee`.
    #[must_use]
    pub const fn assign_to(mut self, assignee: UserId) -> Self {
        self.assignee = Some(FieldPatch::Set(assignee));
        self
    }

    /// Removes the assignee.
    #[must_use]
    pub const fn unassign(mut self) -> Self {
        self.assignee = Some(FieldPatch::Clear);
        self
    }

    pub(super) fn into_patch(self) -> Result<TaskPatch, TaskDomainError> {
        Ok(TaskPatch {
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            status: self.status.map(TaskStatus::new).transpose()?,
            assignee: self.assignee,
        })
    }
}
