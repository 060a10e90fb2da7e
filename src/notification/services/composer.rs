//! Renders notification messages from configurable templates.

use crate::notification::domain::{Notification, NotificationKind, NotificationSubject};
use crate::task::domain::TaskId;
use crate::user::domain::UserId;
use minijinja::{Environment, Value, context};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `minijinja` templates for each notification kind.
///
/// Templates see `task_title` and, for badge notifications, `badge`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationTemplates {
    /// Template for [`NotificationKind::BadgeAwarded`].
    pub badge_awarded: String,
    /// Template for [`NotificationKind::TaskDone`].
    pub task_done: String,
    /// Template for [`NotificationKind::TaskOverdue`].
    pub task_overdue: String,
}

impl Default for NotificationTemplates {
    fn default() -> Self {
        Self {
            badge_awarded: concat!(
                "Congratulations! You earned the badge \"{{ badge }}\" ",
                "for completing \"{{ task_title }}\"."
            )
            .to_owned(),
            task_done: "Task \"{{ task_title }}\" is marked as Done.".to_owned(),
            task_overdue: "Task \"{{ task_title }}\" is overdue!".to_owned(),
        }
    }
}

impl NotificationTemplates {
    /// Returns the template used for `kind`.
    #[must_use]
    pub fn for_kind(&self, kind: NotificationKind) -> &str {
        match kind {
            NotificationKind::BadgeAwarded => &self.badge_awarded,
            NotificationKind::TaskDone => &self.task_done,
            NotificationKind::TaskOverdue => &self.task_overdue,
        }
    }
}

/// Error returned when a notification template cannot be rendered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to render {kind} notification: {reason}")]
pub struct NotificationComposeError {
    /// Kind whose template failed.
    pub kind: NotificationKind,
    /// Renderer diagnostic.
    pub reason: String,
}

/// Builds notification records from subjects.
#[derive(Debug, Clone, Default)]
pub struct NotificationComposer {
    templates: NotificationTemplates,
}

impl NotificationComposer {
    /// Creates a composer using `templates`.
    #[must_use]
    pub const fn new(templates: NotificationTemplates) -> Self {
        Self { templates }
    }

    /// Returns the configured templates.
    #[must_use]
    pub const fn templates(&self) -> &NotificationTemplates {
        &self.templates
    }

    /// Renders the message text for `subject`.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationComposeError`] when the template is invalid or
    /// fails to render.
    pub fn render(
        &self,
        subject: &NotificationSubject,
    ) -> Result<String, NotificationComposeError> {
        let kind = subject.kind();
        let badge = match subject {
            NotificationSubject::BadgeAwarded { badge, .. } => Value::from(badge.as_str()),
            NotificationSubject::TaskDone { .. } | NotificationSubject::TaskOverdue { .. } => {
                Value::UNDEFINED
            }
        };
        let environment = Environment::new();
        environment
            .render_str(
                self.templates.for_kind(kind),
                context! {
                    task_title => subject.task_title(),
                    badge => badge,
                },
            )
            .map_err(|error| NotificationComposeError {
                kind,
                reason: error.to_string(),
            })
    }

    /// Renders `subject` into a notification for `recipient` about `task`.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationComposeError`] when rendering fails.
    pub fn compose(
        &self,
        recipient: UserId,
        task: TaskId,
        subject: &NotificationSubject,
        clock: &impl Clock,
    ) -> Result<Notification, NotificationComposeError> {
        let message = self.render(subject)?;
        Ok(Notification::new(
            recipient,
            Some(task),
            subject.kind(),
            message,
            clock,
        ))
    }
}
