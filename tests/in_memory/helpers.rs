//! Shared wiring for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use taskboard::automation::{
    adapters::memory::InMemoryAutomationRuleRepository, services::AutomationRuleService,
};
use taskboard::notification::{
    adapters::memory::InMemoryNotificationRepository, domain::Notification,
    ports::NotificationRepository,
};
use taskboard::task::{
    adapters::memory::{InMemoryProjectRepository, InMemoryTaskRepository},
    domain::{Project, StatusPipeline},
    ports::ProjectRepository,
    services::{DueDateSweeper, TaskLifecycleService},
};
use taskboard::user::{
    adapters::memory::InMemoryUserRepository,
    domain::{Badge, User, UserId},
    ports::UserRepository,
};

/// Task service wired to in-memory stores.
pub type Lifecycle = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryProjectRepository,
    InMemoryAutomationRuleRepository,
    InMemoryUserRepository,
    InMemoryNotificationRepository,
    DefaultClock,
>;

/// Rule service wired to in-memory stores.
pub type Rules = AutomationRuleService<
    InMemoryAutomationRuleRepository,
    InMemoryProjectRepository,
    DefaultClock,
>;

/// Sweeper wired to in-memory stores.
pub type Sweeper =
    DueDateSweeper<InMemoryTaskRepository, InMemoryNotificationRepository, DefaultClock>;

/// A project owned by Olive with Uma as a member, plus every service.
pub struct Workspace {
    pub lifecycle: Lifecycle,
    pub rules: Rules,
    pub sweeper: Sweeper,
    pub rule_store: Arc<InMemoryAutomationRuleRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub notifications: Arc<InMemoryNotificationRepository>,
    pub project: Project,
    pub owner: UserId,
    pub member: UserId,
}

impl Workspace {
    /// Returns `user`'s inbox, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification store fails.
    pub async fn inbox(&self, user: UserId) -> eyre::Result<Vec<Notification>> {
        Ok(self.notifications.list_for_recipient(user).await?)
    }

    /// Returns the badges `user` holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is missing or the store fails.
    pub async fn badges(&self, user: UserId) -> eyre::Result<Vec<Badge>> {
        let stored = self
            .users
            .find_by_id(user)
            .await?
            .ok_or_else(|| eyre::eyre!("user {user} should exist"))?;
        Ok(stored.badges().iter().cloned().collect())
    }
}

/// Builds a workspace whose project uses the default pipeline.
///
/// # Errors
///
/// Returns an error if any fixture record cannot be stored.
pub async fn workspace() -> eyre::Result<Workspace> {
    workspace_with(StatusPipeline::default()).await
}

/// Builds a workspace whose project uses `statuses`.
///
/// # Errors
///
/// Returns an error if any fixture record cannot be stored.
pub async fn workspace_with(statuses: StatusPipeline) -> eyre::Result<Workspace> {
    let clock = Arc::new(DefaultClock);
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let projects = Arc::new(InMemoryProjectRepository::new());
    let rule_store = Arc::new(InMemoryAutomationRuleRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let notifications = Arc::new(InMemoryNotificationRepository::new());

    let owner = User::new("Olive", "olive@example.com", &DefaultClock)?;
    let member = User::new("Uma", "uma@example.com", &DefaultClock)?;
    users.store(&owner).await?;
    users.store(&member).await?;
    let mut project = Project::new("Launch", owner.id(), &DefaultClock)?.with_statuses(statuses);
    project.add_member(member.id());
    projects.store(&project).await?;

    let lifecycle = TaskLifecycleService::new(
        Arc::clone(&tasks),
        Arc::clone(&projects),
        Arc::clone(&rule_store),
        Arc::clone(&users),
        Arc::clone(&notifications),
        Arc::clone(&clock),
    );
    let rules = AutomationRuleService::new(Arc::clone(&rule_store), projects, Arc::clone(&clock));
    let sweeper = DueDateSweeper::new(tasks, Arc::clone(&notifications), clock);

    Ok(Workspace {
        lifecycle,
        rules,
        sweeper,
        rule_store,
        users,
        notifications,
        project,
        owner: owner.id(),
        member: member.id(),
    })
}
