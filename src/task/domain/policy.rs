//! Status policy: legality of proposed task changes and derived statuses.
//!
//! The policy is pure. It never touches storage; it checks a proposal against
//! the task's current state and its project's pipeline, resolves the
//! effective status, and describes the outcome as a [`TaskChange`].
//!
//! Rules, in precedence order:
//!
//! 1. A "Done" task cannot be moved to any other status.
//! 2. Assigning a previously unassigned task without an explicit status
//!    change moves it to "In Progress".
//! 3. A task created with an assignee and no status (or "To Do") starts in
//!    "In Progress".
//! 4. Every explicit status must belong to the project's pipeline. Forced
//!    statuses missing from the pipeline are not applied.

use super::{Project, Task, TaskDomainError, TaskStatus};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};

/// Replacement or removal of an optional field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPatch<T> {
    /// Replace the value.
    Set(T),
    /// Remove the value.
    Clear,
}

impl<T> FieldPatch<T> {
    /// Returns the value the field holds after patching.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Clear => None,
        }
    }

    /// Returns the new value when the patch sets one.
    #[must_use]
    pub const fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Clear => None,
        }
    }
}

/// Proposed changes to an existing task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New or cleared description.
    pub description: Option<FieldPatch<String>>,
    /// New or cleared due date.
    pub due_date: Option<FieldPatch<DateTime<Utc>>>,
    /// Explicitly requested status.
    pub status: Option<TaskStatus>,
    /// New or cleared assignee.
    pub assignee: Option<FieldPatch<UserId>>,
}

/// Proposed fields for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Title, trimmed during validation.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Explicitly requested initial status.
    pub status: Option<TaskStatus>,
    /// Initial assignee.
    pub assignee: Option<UserId>,
}

/// The status and assignee on either side of a task mutation.
///
/// This is the change event the automation engine reacts to. On creation the
/// previous status and assignee are absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChange {
    previous_status: Option<TaskStatus>,
    new_status: TaskStatus,
    previous_assignee: Option<UserId>,
    new_assignee: Option<UserId>,
}

impl TaskChange {
    /// Describes a change from `previous_status`/`previous_assignee`.
    #[must_use]
    pub const fn new(
        previous_status: Option<TaskStatus>,
        new_status: TaskStatus,
        previous_assignee: Option<UserId>,
        new_assignee: Option<UserId>,
    ) -> Self {
        Self {
            previous_status,
            new_status,
            previous_assignee,
            new_assignee,
        }
    }

    /// Describes the creation of a task with no prior state.
    #[must_use]
    pub const fn creation(status: TaskStatus, assignee: Option<UserId>) -> Self {
        Self::new(None, status, None, assignee)
    }

    /// Returns the status before the mutation, if the task existed.
    #[must_use]
    pub const fn previous_status(&self) -> Option<&TaskStatus> {
        self.previous_status.as_ref()
    }

    /// Returns the status after the mutation.
    #[must_use]
    pub const fn new_status(&self) -> &TaskStatus {
        &self.new_status
    }

    /// Returns the assignee before the mutation.
    #[must_use]
    pub const fn previous_assignee(&self) -> Option<UserId> {
        self.previous_assignee
    }

    /// Returns the assignee after the mutation.
    #[must_use]
    pub const fn new_assignee(&self) -> Option<UserId> {
        self.new_assignee
    }

    /// Returns whether the mutation crossed into "Done".
    ///
    /// This is a one-way latch: a task that was already done does not enter
    /// "Done" again.
    #[must_use]
    pub fn entered_done(&self) -> bool {
        self.new_status.is_done()
            && !self
                .previous_status
                .as_ref()
                .is_some_and(TaskStatus::is_done)
    }

    /// Returns whether the assignee changed.
    #[must_use]
    pub fn assignee_changed(&self) -> bool {
        self.previous_assignee != self.new_assignee
    }
}

/// A task update accepted by the policy, with its effective status resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpdate {
    pub(super) title: Option<String>,
    pub(super) description: Option<FieldPatch<String>>,
    pub(super) due_date: Option<FieldPatch<DateTime<Utc>>>,
    pub(super) change: TaskChange,
    pub(super) status_forced: bool,
}

impl ValidatedUpdate {
    /// Returns the change event this update produces.
    #[must_use]
    pub const fn change(&self) -> &TaskChange {
        &self.change
    }

    /// Returns the trimmed new title, if the title changes.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns whether the policy forced the effective status.
    #[must_use]
    pub const fn status_forced(&self) -> bool {
        self.status_forced
    }
}

/// A task creation accepted by the policy, with its initial status resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCreation {
    pub(super) title: String,
    pub(super) description: Option<String>,
    pub(super) due_date: Option<DateTime<Utc>>,
    pub(super) status: TaskStatus,
    pub(super) assignee: Option<UserId>,
}

impl ValidatedCreation {
    /// Returns the trimmed title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the resolved initial status.
    #[must_use]
    pub const fn status(&self) -> &TaskStatus {
        &self.status
    }

    /// Returns the initial assignee.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }
}

/// Validates a proposed update to `task`.
///
/// # Errors
///
/// Returns [`TaskDomainError::DoneTaskImmutable`] when a done task would move
/// to another status, [`TaskDomainError::InvalidStatus`] when the requested
/// status is not in the project's pipeline, and
/// [`TaskDomainError::EmptyTitle`] for a blank new title.
pub fn validate_update(
    task: &Task,
    project: &Project,
    patch: TaskPatch,
) -> Result<ValidatedUpdate, TaskDomainError> {
    let TaskPatch {
        title: requested_title,
        description,
        due_date,
        status: requested_status,
        assignee,
    } = patch;
    let current = task.status();

    if current.is_done() && requested_status.as_ref().is_some_and(|status| !status.is_done()) {
        return Err(TaskDomainError::DoneTaskImmutable(task.id()));
    }
    if let Some(status) = requested_status.as_ref() {
        ensure_in_pipeline(project, status)?;
    }
    let title = requested_title.map(normalise_title).transpose()?;

    let previous_assignee = task.assignee();
    let newly_assigned = previous_assignee.is_none()
        && assignee.as_ref().and_then(FieldPatch::as_set).is_some();
    let new_assignee = assignee.map_or(previous_assignee, FieldPatch::into_option);

    // Re-sending the current status is not an explicit status change.
    let explicit_status = requested_status.filter(|status| status != current);
    let in_progress = TaskStatus::in_progress();
    let new_status = match explicit_status {
        Some(status) => status,
        None if newly_assigned
            && !current.is_done()
            && project.statuses().contains(&in_progress) =>
        {
            in_progress
        }
        None => current.clone(),
    };
    let status_forced = newly_assigned && &new_status != current;

    Ok(ValidatedUpdate {
        title,
        description,
        due_date,
        change: TaskChange::new(
            Some(current.clone()),
            new_status,
            previous_assignee,
            new_assignee,
        ),
        status_forced,
    })
}

/// Validates a proposed new task for `project`.
///
/// # Errors
///
/// Returns [`TaskDomainError::EmptyTitle`] for a blank title and
/// [`TaskDomainError::InvalidStatus`] when the requested status is not in
/// the project's pipeline.
pub fn validate_creation(
    project: &Project,
    draft: TaskDraft,
) -> Result<ValidatedCreation, TaskDomainError> {
    let TaskDraft {
        title: requested_title,
        description,
        due_date,
        status: requested_status,
        assignee,
    } = draft;
    let title = normalise_title(requested_title)?;
    if let Some(status) = requested_status.as_ref() {
        ensure_in_pipeline(project, status)?;
    }

    let pipeline = project.statuses();
    let in_progress = TaskStatus::in_progress();
    let wants_initial = requested_status.as_ref().is_none_or(TaskStatus::is_to_do);
    let status = if assignee.is_some() && wants_initial && pipeline.contains(&in_progress) {
        in_progress
    } else {
        requested_status.unwrap_or_else(|| pipeline.initial_status())
    };

    Ok(ValidatedCreation {
        title,
        description,
        due_date,
        status,
        assignee,
    })
}

/// Checks whether automation may move `task` to `status`.
///
/// # Errors
///
/// Returns [`TaskDomainError::DoneTaskImmutable`] when the task is done and
/// [`TaskDomainError::InvalidStatus`] when `status` is not in the pipeline.
pub fn check_forced_status(
    task: &Task,
    project: &Project,
    status: &TaskStatus,
) -> Result<(), TaskDomainError> {
    if task.is_done() {
        return Err(TaskDomainError::DoneTaskImmutable(task.id()));
    }
    ensure_in_pipeline(project, status)
}

/// Ensures `status` belongs to the project's pipeline.
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidStatus`] otherwise.
pub fn ensure_in_pipeline(project: &Project, status: &TaskStatus) -> Result<(), TaskDomainError> {
    if project.statuses().contains(status) {
        return Ok(());
    }
    Err(TaskDomainError::InvalidStatus {
        status: status.as_str().to_owned(),
        project: project.id(),
    })
}

fn normalise_title(raw: String) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}
