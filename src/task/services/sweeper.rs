//! Periodic scan for overdue tasks.

use crate::notification::{
    domain::{Notification, NotificationKind, NotificationSubject},
    ports::NotificationRepository,
    services::NotificationComposer,
};
use crate::task::{
    domain::Task,
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::user::domain::UserId;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Controls repeat notifications across sweeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepPolicy {
    renotify_after: Option<Duration>,
}

impl SweepPolicy {
    /// Notifies on every sweep. This is the default.
    #[must_use]
    pub const fn always() -> Self {
        Self {
            renotify_after: None,
        }
    }

    /// Skips a task whose assignee received an overdue notice for it less
    /// than `window` ago.
    #[must_use]
    pub const fn suppress_within(window: Duration) -> Self {
        Self {
            renotify_after: Some(window),
        }
    }

    /// Returns the suppression window, if any.
    #[must_use]
    pub const fn renotify_after(&self) -> Option<Duration> {
        self.renotify_after
    }

    fn suppresses(&self, previous: Option<&Notification>, now: DateTime<Utc>) -> bool {
        match (self.renotify_after, previous) {
            (Some(window), Some(sent)) => now - sent.created_at() < window,
            _ => false,
        }
    }
}

/// Summary of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Open tasks past their due date, assigned or not.
    pub overdue_tasks: usize,
    /// Overdue notifications appended.
    pub notifications_emitted: usize,
    /// Notifications withheld by the sweep policy.
    pub suppressed: usize,
    /// Notifications that could not be rendered or stored.
    pub failures: usize,
}

/// Errors that abort a sweep.
#[derive(Debug, Error)]
pub enum DueDateSweepError {
    /// Overdue tasks could not be listed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Notifies assignees about open tasks past their due date.
///
/// The sweep never modifies tasks. Per-task failures are counted in the
/// report and do not stop the sweep.
#[derive(Clone)]
pub struct DueDateSweeper<T, N, C>
where
    T: TaskRepository,
    N: NotificationRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    notifications: Arc<N>,
    composer: NotificationComposer,
    policy: SweepPolicy,
    clock: Arc<C>,
}

impl<T, N, C> DueDateSweeper<T, N, C>
where
    T: TaskRepository,
    N: NotificationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a sweeper that notifies on every run.
    #[must_use]
    pub fn new(tasks: Arc<T>, notifications: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            notifications,
            composer: NotificationComposer::default(),
            policy: SweepPolicy::default(),
            clock,
        }
    }

    /// Replaces the notification composer.
    #[must_use]
    pub fn with_composer(mut self, composer: NotificationComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Replaces the repeat-notification policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: SweepPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sweeps at the clock's current time.
    ///
    /// # Errors
    ///
    /// Returns [`DueDateSweepError::Repository`] when overdue tasks cannot be
    /// listed.
    pub async fn sweep(&self) -> Result<SweepReport, DueDateSweepError> {
        self.sweep_overdue(self.clock.utc()).await
    }

    /// Notifies the assignee of every open task due before `now`.
    ///
    /// # Errors
    ///
    /// Returns [`DueDateSweepError::Repository`] when overdue tasks cannot be
    /// listed.
    pub async fn sweep_overdue(
        &self,
        now: DateTime<Utc>,
    ) -> Result<SweepReport, DueDateSweepError> {
        let overdue = self.tasks.find_overdue_open(now).await?;
        let mut report = SweepReport {
            overdue_tasks: overdue.len(),
            ..SweepReport::default()
        };

        for task in &overdue {
            let Some(assignee) = task.assignee() else {
                continue;
            };
            match self.notify_overdue(task, assignee, now).await {
                Ok(true) => report.notifications_emitted += 1,
                Ok(false) => report.suppressed += 1,
                Err(reason) => {
                    warn!(task_id = %task.id(), %assignee, %reason, "overdue notification failed");
                    report.failures += 1;
                }
            }
        }

        info!(
            overdue = report.overdue_tasks,
            emitted = report.notifications_emitted,
            suppressed = report.suppressed,
            failures = report.failures,
            "due-date sweep finished"
        );
        Ok(report)
    }

    /// Returns `Ok(false)` when the policy suppressed the notification.
    async fn notify_overdue(
        &self,
        task: &Task,
        assignee: UserId,
        now: DateTime<Utc>,
    ) -> Result<bool, String> {
        if self.policy.renotify_after().is_some() {
            let previous = self
                .notifications
                .latest_for_task(assignee, task.id(), NotificationKind::TaskOverdue)
                .await
                .map_err(|err| err.to_string())?;
            if self.policy.suppresses(previous.as_ref(), now) {
                debug!(task_id = %task.id(), %assignee, "overdue notification suppressed");
                return Ok(false);
            }
        }

        let subject = NotificationSubject::TaskOverdue {
            task_title: task.title().to_owned(),
        };
        let notification = self
            .composer
            .compose(assignee, task.id(), &subject, &*self.clock)
            .map_err(|err| err.to_string())?;
        self.notifications
            .append(&notification)
            .await
            .map_err(|err| err.to_string())?;
        Ok(true)
    }
}
