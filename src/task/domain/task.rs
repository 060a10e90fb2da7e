//! Task aggregate root.

use super::{
    ProjectId, TaskChange, TaskDomainError, TaskId, TaskStatus, ValidatedCreation, ValidatedUpdate,
};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A comment left on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    author: UserId,
    text: String,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a comment with trimmed text.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyComment`] when the text is blank.
    pub fn new(
        author: UserId,
        text: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let raw = text.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyComment);
        }
        Ok(Self {
            author,
            text: trimmed.to_owned(),
            created_at: clock.utc(),
        })
    }

    /// Returns the comment author.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the comment text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project: ProjectId,
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    status: TaskStatus,
    assignee: Option<UserId>,
    created_by: UserId,
    comments: Vec<Comment>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning project.
    pub project: ProjectId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted assignee.
    pub assignee: Option<UserId>,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted comments in posting order.
    pub comments: Vec<Comment>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted completion timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a task from a creation request accepted by the status policy.
    #[must_use]
    pub fn create(
        project: ProjectId,
        creation: ValidatedCreation,
        created_by: UserId,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        let ValidatedCreation {
            title,
            description,
            due_date,
            status,
            assignee,
        } = creation;
        let updated_at = status.is_done().then_some(timestamp);

        Self {
            id: TaskId::new(),
            project,
            title,
            description,
            due_date,
            status,
            assignee,
            created_by,
            comments: Vec::new(),
            created_at: timestamp,
            updated_at,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project: data.project,
            title: data.title,
            description: data.description,
            due_date: data.due_date,
            status: data.status,
            assignee: data.assignee,
            created_by: data.created_by,
            comments: data.comments,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the trimmed title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> &TaskStatus {
        &self.status
    }

    /// Returns whether the task is "Done".
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }

    /// Returns the creator.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the comments in posting order.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the task entered "Done", if it has.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Returns whether the task is past its due date at `now` and not done.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_done() && self.due_date.is_some_and(|due| due < now)
    }

    /// Ensures the task may be deleted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DoneTaskImmutable`] when the task is done.
    pub fn ensure_deletable(&self) -> Result<(), TaskDomainError> {
        if self.is_done() {
            return Err(TaskDomainError::DoneTaskImmutable(self.id));
        }
        Ok(())
    }

    /// Applies an update accepted by the status policy and returns the change
    /// event it produced.
    pub fn apply(&mut self, update: ValidatedUpdate, clock: &impl Clock) -> TaskChange {
        let ValidatedUpdate {
            title,
            description,
            due_date,
            change,
            ..
        } = update;
        if let Some(new_title) = title {
            self.title = new_title;
        }
        if let Some(patch) = description {
            self.description = patch.into_option();
        }
        if let Some(patch) = due_date {
            self.due_date = patch.into_option();
        }
        self.assignee = change.new_assignee();
        self.enter_status(change.new_status().clone(), clock);
        change
    }

    /// Moves the task to a status forced by automation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DoneTaskImmutable`] when the task is done.
    pub fn force_status(
        &mut self,
        status: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if self.is_done() {
            return Err(TaskDomainError::DoneTaskImmutable(self.id));
        }
        self.enter_status(status, clock);
        Ok(())
    }

    /// Appends a comment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyComment`] when the text is blank.
    pub fn add_comment(
        &mut self,
        author: UserId,
        text: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Comment, TaskDomainError> {
        let comment = Comment::new(author, text, clock)?;
        self.comments.push(comment.clone());
        Ok(comment)
    }

    /// Sets the status, stamping `updated_at` on entry into "Done".
    fn enter_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        if status.is_done() && !self.status.is_done() {
            self.updated_at = Some(clock.utc());
        }
        self.status = status;
    }
}
