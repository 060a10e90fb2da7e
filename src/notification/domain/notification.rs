//! Notification records and the subjects they report on.

use super::{NotificationId, ParseNotificationKindError};
use crate::task::domain::TaskId;
use crate::user::domain::{Badge, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// The recipient earned a badge.
    BadgeAwarded,
    /// A task assigned to the recipient reached "Done".
    TaskDone,
    /// A task assigned to the recipient is past its due date.
    TaskOverdue,
}

impl NotificationKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadgeAwarded => "badge_awarded",
            Self::TaskDone => "task_done",
            Self::TaskOverdue => "task_overdue",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for NotificationKind {
    type Error = ParseNotificationKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "badge_awarded" => Ok(Self::BadgeAwarded),
            "task_done" => Ok(Self::TaskDone),
            "task_overdue" => Ok(Self::TaskOverdue),
            _ => Err(ParseNotificationKindError(value.to_owned())),
        }
    }
}

/// What a notification reports, with the values its message is rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationSubject {
    /// A badge was granted for completing a task.
    BadgeAwarded {
        /// Granted badge.
        badge: Badge,
        /// Title of the completed task.
        task_title: String,
    },
    /// A task reached "Done".
    TaskDone {
        /// Title of the completed task.
        task_title: String,
    },
    /// A task is overdue.
    TaskOverdue {
        /// Title of the overdue task.
        task_title: String,
    },
}

impl NotificationSubject {
    /// Returns the notification kind for this subject.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        match self {
            Self::BadgeAwarded { .. } => NotificationKind::BadgeAwarded,
            Self::TaskDone { .. } => NotificationKind::TaskDone,
            Self::TaskOverdue { .. } => NotificationKind::TaskOverdue,
        }
    }

    /// Returns the title of the task the subject refers to.
    #[must_use]
    pub fn task_title(&self) -> &str {
        match self {
            Self::BadgeAwarded { task_title, .. }
            | Self::TaskDone { task_title }
            | Self::TaskOverdue { task_title } => task_title,
        }
    }
}

/// Append-only message addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    recipient: UserId,
    task: Option<TaskId>,
    kind: NotificationKind,
    message: String,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedNotificationData {
    /// Persisted notification identifier.
    pub id: NotificationId,
    /// Persisted recipient.
    pub recipient: UserId,
    /// Persisted task reference, if any.
    pub task: Option<TaskId>,
    /// Persisted notification kind.
    pub kind: NotificationKind,
    /// Persisted rendered message.
    pub message: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates a notification stamped with the current clock time.
    #[must_use]
    pub fn new(
        recipient: UserId,
        task: Option<TaskId>,
        kind: NotificationKind,
        message: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            recipient,
            task,
            kind,
            message: message.into(),
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a notification from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedNotificationData) -> Self {
        Self {
            id: data.id,
            recipient: data.recipient,
            task: data.task,
            kind: data.kind,
            message: data.message,
            created_at: data.created_at,
        }
    }

    /// Returns the notification identifier.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the recipient.
    #[must_use]
    pub const fn recipient(&self) -> UserId {
        self.recipient
    }

    /// Returns the task the notification refers to, if any.
    #[must_use]
    pub const fn task(&self) -> Option<TaskId> {
        self.task
    }

    /// Returns the notification kind.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Returns the rendered message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
