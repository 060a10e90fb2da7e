//! Shared world state for task automation BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::automation::{
    adapters::memory::InMemoryAutomationRuleRepository, services::AutomationRuleService,
};
use taskboard::notification::adapters::memory::InMemoryNotificationRepository;
use taskboard::task::{
    adapters::memory::{InMemoryProjectRepository, InMemoryTaskRepository},
    domain::{Project, ProjectId, StatusPipeline, Task},
    ports::ProjectRepository,
    services::{DueDateSweeper, SweepReport, TaskLifecycleError, TaskLifecycleService},
};
use taskboard::user::{adapters::memory::InMemoryUserRepository, domain::UserId};

/// Task service used by the BDD world.
pub type TestLifecycle = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryProjectRepository,
    InMemoryAutomationRuleRepository,
    InMemoryUserRepository,
    InMemoryNotificationRepository,
    DefaultClock,
>;

/// Rule service used by the BDD world.
pub type TestRules = AutomationRuleService<
    InMemoryAutomationRuleRepository,
    InMemoryProjectRepository,
    DefaultClock,
>;

/// Sweeper used by the BDD world.
pub type TestSweeper =
    DueDateSweeper<InMemoryTaskRepository, InMemoryNotificationRepository, DefaultClock>;

/// Scenario world for task automation behaviour tests.
pub struct TaskAutomationWorld {
    pub lifecycle: TestLifecycle,
    pub rules: TestRules,
    pub sweeper: TestSweeper,
    pub projects: Arc<InMemoryProjectRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub notifications: Arc<InMemoryNotificationRepository>,
    pub people: HashMap<String, UserId>,
    pub pipeline: StatusPipeline,
    pub project: Option<Project>,
    pub project_stored: bool,
    pub task: Option<Task>,
    pub last_update: Option<Result<Task, TaskLifecycleError>>,
    pub last_sweep: Option<SweepReport>,
}

impl TaskAutomationWorld {
    /// Creates a world with empty stores and the default pipeline.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(DefaultClock);
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let projects = Arc::new(InMemoryProjectRepository::new());
        let rules = Arc::new(InMemoryAutomationRuleRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let notifications = Arc::new(InMemoryNotificationRepository::new());

        Self {
            lifecycle: TaskLifecycleService::new(
                Arc::clone(&tasks),
                Arc::clone(&projects),
                Arc::clone(&rules),
                Arc::clone(&users),
                Arc::clone(&notifications),
                Arc::clone(&clock),
            ),
            rules: AutomationRuleService::new(rules, Arc::clone(&projects), Arc::clone(&clock)),
            sweeper: DueDateSweeper::new(tasks, Arc::clone(&notifications), clock),
            projects,
            users,
            notifications,
            people: HashMap::new(),
            pipeline: StatusPipeline::default(),
            project: None,
            project_stored: false,
            task: None,
            last_update: None,
            last_sweep: None,
        }
    }

    /// Resolves a scenario name to the user registered under it.
    ///
    /// # Errors
    ///
    /// Returns an error if no user has that name.
    pub fn person(&self, name: &str) -> eyre::Result<UserId> {
        self.people
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("no user named {name} in scenario world"))
    }

    /// Returns the scenario project.
    ///
    /// # Errors
    ///
    /// Returns an error if no project has been created yet.
    pub fn current_project(&self) -> eyre::Result<&Project> {
        self.project
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Stores the scenario project on first use and returns its identifier.
    ///
    /// Membership steps edit the project in place, so it is only written
    /// once a service needs to find it.
    ///
    /// # Errors
    ///
    /// Returns an error if no project exists or the store rejects it.
    pub fn stored_project(&mut self) -> eyre::Result<ProjectId> {
        let project = self.current_project()?.clone();
        if !self.project_stored {
            run_async(self.projects.store(&project))?;
            self.project_stored = true;
        }
        Ok(project.id())
    }

    /// Returns the scenario task.
    ///
    /// # Errors
    ///
    /// Returns an error if no task has been created yet.
    pub fn current_task(&self) -> eyre::Result<&Task> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }
}

impl Default for TaskAutomationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskAutomationWorld {
    TaskAutomationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
