//! Executes matched effects against the user, task, and notification stores.

use crate::automation::domain::{AppliedEffect, Effect, EffectOutcome};
use crate::notification::{
    domain::NotificationSubject, ports::NotificationRepository, services::NotificationComposer,
};
use crate::task::{
    domain::{Project, Task, TaskStatus, policy},
    ports::TaskRepository,
};
use crate::user::{
    domain::{Badge, UserId},
    ports::UserRepository,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened when a batch of effects was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    task: Task,
    outcomes: Vec<AppliedEffect>,
}

impl ApplyReport {
    /// Returns the task after all forced statuses were applied.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns each effect with its outcome, in application order.
    #[must_use]
    pub fn outcomes(&self) -> &[AppliedEffect] {
        &self.outcomes
    }

    /// Returns the number of effects that failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|applied| applied.outcome.is_failed())
            .count()
    }

    /// Consumes the report, returning the task.
    #[must_use]
    pub fn into_task(self) -> Task {
        self.task
    }
}

/// Applies automation effects one at a time.
///
/// Every effect is attempted; a failure is recorded in the report and never
/// stops the effects after it.
#[derive(Clone)]
pub struct EffectApplier<T, U, N, C>
where
    T: TaskRepository,
    U: UserRepository,
    N: NotificationRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    users: Arc<U>,
    notifications: Arc<N>,
    composer: NotificationComposer,
    clock: Arc<C>,
}

impl<T, U, N, C> EffectApplier<T, U, N, C>
where
    T: TaskRepository,
    U: UserRepository,
    N: NotificationRepository,
    C: Clock + Send + Sync,
{
    /// Creates an applier with the default notification templates.
    #[must_use]
    pub fn new(tasks: Arc<T>, users: Arc<U>, notifications: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            users,
            notifications,
            composer: NotificationComposer::default(),
            clock,
        }
    }

    /// Replaces the notification composer.
    #[must_use]
    pub fn with_composer(mut self, composer: NotificationComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Applies `effects` in order to `task`, which belongs to `project`.
    pub async fn apply(&self, effects: Vec<Effect>, task: Task, project: &Project) -> ApplyReport {
        let mut current = task;
        let mut outcomes = Vec::with_capacity(effects.len());
        for effect in effects {
            let outcome = match &effect {
                Effect::GrantBadge { user, badge } => self.grant_badge(*user, badge).await,
                Effect::ForceStatus { status } => {
                    self.force_status(&mut current, project, status).await
                }
                Effect::Notify { recipient, subject } => {
                    self.notify(*recipient, &current, subject).await
                }
            };
            log_outcome(&current, &effect, &outcome);
            outcomes.push(AppliedEffect { effect, outcome });
        }
        ApplyReport {
            task: current,
            outcomes,
        }
    }

    async fn grant_badge(&self, user: UserId, badge: &Badge) -> EffectOutcome {
        match self.users.grant_badge(user, badge).await {
            Ok(grant) => {
                debug!(%user, %badge, ?grant, "badge grant recorded");
                EffectOutcome::Applied
            }
            Err(err) => EffectOutcome::Failed {
                reason: err.to_string(),
            },
        }
    }

    async fn force_status(
        &self,
        task: &mut Task,
        project: &Project,
        status: &TaskStatus,
    ) -> EffectOutcome {
        if let Err(err) = policy::check_forced_status(task, project, status) {
            return EffectOutcome::Skipped {
                reason: err.to_string(),
            };
        }
        let mut candidate = task.clone();
        if let Err(err) = candidate.force_status(status.clone(), &*self.clock) {
            return EffectOutcome::Skipped {
                reason: err.to_string(),
            };
        }
        match self.tasks.update(&candidate).await {
            Ok(()) => {
                *task = candidate;
                EffectOutcome::Applied
            }
            Err(err) => EffectOutcome::Failed {
                reason: err.to_string(),
            },
        }
    }

    async fn notify(
        &self,
        recipient: UserId,
        task: &Task,
        subject: &NotificationSubject,
    ) -> EffectOutcome {
        let notification = match self
            .composer
            .compose(recipient, task.id(), subject, &*self.clock)
        {
            Ok(notification) => notification,
            Err(err) => {
                return EffectOutcome::Failed {
                    reason: err.to_string(),
                };
            }
        };
        match self.notifications.append(&notification).await {
            Ok(()) => EffectOutcome::Applied,
            Err(err) => EffectOutcome::Failed {
                reason: err.to_string(),
            },
        }
    }
}

fn log_outcome(task: &Task, effect: &Effect, outcome: &EffectOutcome) {
    let task_id = task.id();
    match outcome {
        EffectOutcome::Applied => debug!(%task_id, %effect, "automation effect applied"),
        EffectOutcome::Skipped { reason } => {
            info!(%task_id, %effect, %reason, "automation effect skipped");
        }
        EffectOutcome::Failed { reason } => {
            warn!(%task_id, %effect, %reason, "automation effect failed");
        }
    }
}
