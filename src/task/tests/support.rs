//! Shared fixtures for task service tests.

use std::sync::Arc;

use crate::automation::{
    adapters::memory::InMemoryAutomationRuleRepository,
    domain::{AutomationRule, RuleDefinition},
    ports::AutomationRuleRepository,
};
use crate::notification::{
    adapters::memory::InMemoryNotificationRepository,
    domain::{Notification, NotificationKind},
    ports::{NotificationRepository, NotificationRepositoryResult},
};
use crate::task::{
    adapters::memory::{InMemoryProjectRepository, InMemoryTaskRepository},
    domain::{Project, StatusPipeline, TaskId},
    ports::ProjectRepository,
    services::TaskLifecycleService,
};
use crate::user::{
    adapters::memory::InMemoryUserRepository,
    domain::{Badge, BadgeGrant, User, UserId},
    ports::{UserRepository, UserRepositoryResult},
};
use async_trait::async_trait;
use mockable::DefaultClock;
use mockall::mock;

mock! {
    pub Users {}

    #[async_trait]
    impl UserRepository for Users {
        async fn store(&self, user: &User) -> UserRepositoryResult<()>;
        async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>>;
        async fn grant_badge(
            &self,
            user: UserId,
            badge: &Badge,
        ) -> UserRepositoryResult<BadgeGrant>;
    }
}

mock! {
    pub Notifications {}

    #[async_trait]
    impl NotificationRepository for Notifications {
        async fn append(&self, notification: &Notification) -> NotificationRepositoryResult<()>;
        async fn list_for_recipient(
            &self,
            recipient: UserId,
        ) -> NotificationRepositoryResult<Vec<Notification>>;
        async fn latest_for_task(
            &self,
            recipient: UserId,
            task: TaskId,
            kind: NotificationKind,
        ) -> NotificationRepositoryResult<Option<Notification>>;
    }
}

pub(super) type TestService = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryProjectRepository,
    InMemoryAutomationRuleRepository,
    InMemoryUserRepository,
    InMemoryNotificationRepository,
    DefaultClock,
>;

/// A project with an owner, a second member, and in-memory stores.
pub(super) struct Board {
    pub(super) service: TestService,
    pub(super) tasks: Arc<InMemoryTaskRepository>,
    pub(super) rules: Arc<InMemoryAutomationRuleRepository>,
    pub(super) users: Arc<InMemoryUserRepository>,
    pub(super) notifications: Arc<InMemoryNotificationRepository>,
    pub(super) project: Project,
    pub(super) owner: UserId,
    pub(super) member: UserId,
}

impl Board {
    pub(super) async fn inbox(&self, user: UserId) -> eyre::Result<Vec<Notification>> {
        Ok(self.notifications.list_for_recipient(user).await?)
    }

    pub(super) async fn badges(&self, user: UserId) -> eyre::Result<Vec<Badge>> {
        let stored = self
            .users
            .find_by_id(user)
            .await?
            .ok_or_else(|| eyre::eyre!("user {user} should exist"))?;
        Ok(stored.badges().iter().cloned().collect())
    }

    /// Stores a rule owned by the project owner.
    pub(super) async fn add_rule(&self, definition: RuleDefinition) -> eyre::Result<()> {
        let rule = AutomationRule::new(&self.project, definition, self.owner, &DefaultClock)?;
        self.rules.store(&rule).await?;
        Ok(())
    }
}

pub(super) async fn board(rules: Vec<RuleDefinition>) -> eyre::Result<Board> {
    board_with_pipeline(StatusPipeline::default(), rules).await
}

pub(super) async fn board_with_pipeline(
    statuses: StatusPipeline,
    definitions: Vec<RuleDefinition>,
) -> eyre::Result<Board> {
    let clock = Arc::new(DefaultClock);
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let projects = Arc::new(InMemoryProjectRepository::new());
    let rules = Arc::new(InMemoryAutomationRuleRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let notifications = Arc::new(InMemoryNotificationRepository::new());

    let owner = User::new("Olive", "olive@example.com", &DefaultClock)?;
    let member = User::new("Uma", "uma@example.com", &DefaultClock)?;
    users.store(&owner).await?;
    users.store(&member).await?;

    let mut project = Project::new("Launch", owner.id(), &DefaultClock)?.with_statuses(statuses);
    project.add_member(member.id());
    projects.store(&project).await?;

    for definition in definitions {
        let rule = AutomationRule::new(&project, definition, owner.id(), &DefaultClock)?;
        rules.store(&rule).await?;
    }

    let service = TaskLifecycleService::new(
        Arc::clone(&tasks),
        projects,
        Arc::clone(&rules),
        Arc::clone(&users),
        Arc::clone(&notifications),
        clock,
    );
    Ok(Board {
        service,
        tasks,
        rules,
        users,
        notifications,
        project,
        owner: owner.id(),
        member: member.id(),
    })
}
