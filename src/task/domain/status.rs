//! Status labels and project status pipelines.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const TO_DO: &str = "To Do";
const IN_PROGRESS: &str = "In Progress";
const DONE: &str = "Done";

/// A task status label.
///
/// Labels are project-configurable; "To Do", "In Progress", and "Done" carry
/// lifecycle meaning. "Done" is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskStatus(String);

impl TaskStatus {
    /// Creates a validated status label.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyStatusLabel`] when the label is blank.
    pub fn new(label: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = label.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyStatusLabel);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The initial status of new, unassigned tasks.
    #[must_use]
    pub fn to_do() -> Self {
        Self(TO_DO.to_owned())
    }

    /// The status of assigned work.
    #[must_use]
    pub fn in_progress() -> Self {
        Self(IN_PROGRESS.to_owned())
    }

    /// The terminal status.
    #[must_use]
    pub fn done() -> Self {
        Self(DONE.to_owned())
    }

    /// Returns whether this is the terminal "Done" status.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.0 == DONE
    }

    /// Returns whether this is the "To Do" status.
    #[must_use]
    pub fn is_to_do(&self) -> bool {
        self.0 == TO_DO
    }

    /// Returns the label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskStatus {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, distinct status labels a project's tasks may take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct StatusPipeline(Vec<TaskStatus>);

impl StatusPipeline {
    /// Creates a validated pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyStatusPipeline`] when no labels are
    /// given, [`TaskDomainError::EmptyStatusLabel`] for blank labels, and
    /// [`TaskDomainError::DuplicateStatusLabel`] for repeated labels.
    pub fn new<I, S>(labels: I) -> Result<Self, TaskDomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut statuses: Vec<TaskStatus> = Vec::new();
        for label in labels {
            let status = TaskStatus::new(label)?;
            if statuses.contains(&status) {
                return Err(TaskDomainError::DuplicateStatusLabel(status.0));
            }
            statuses.push(status);
        }
        if statuses.is_empty() {
            return Err(TaskDomainError::EmptyStatusPipeline);
        }
        Ok(Self(statuses))
    }

    /// Returns whether `status` belongs to the pipeline.
    #[must_use]
    pub fn contains(&self, status: &TaskStatus) -> bool {
        self.0.contains(status)
    }

    /// Returns the status given to new tasks: "To Do" when configured,
    /// otherwise the first label.
    #[must_use]
    pub fn initial_status(&self) -> TaskStatus {
        let to_do = TaskStatus::to_do();
        if self.contains(&to_do) {
            return to_do;
        }
        self.0.first().cloned().unwrap_or(to_do)
    }

    /// Returns the labels in pipeline order.
    #[must_use]
    pub fn as_slice(&self) -> &[TaskStatus] {
        &self.0
    }

    /// Iterates over the labels in pipeline order.
    pub fn iter(&self) -> impl Iterator<Item = &TaskStatus> {
        self.0.iter()
    }
}

impl Default for StatusPipeline {
    fn default() -> Self {
        Self(vec![
            TaskStatus::to_do(),
            TaskStatus::in_progress(),
            TaskStatus::done(),
        ])
    }
}

impl TryFrom<Vec<String>> for StatusPipeline {
    type Error = TaskDomainError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(labels)
    }
}

impl From<StatusPipeline> for Vec<String> {
    fn from(pipeline: StatusPipeline) -> Self {
        pipeline.0.into_iter().map(|status| status.0).collect()
    }
}
