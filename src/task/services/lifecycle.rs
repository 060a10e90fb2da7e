//! Service layer for task mutations and the automation they trigger.

use super::requests::{NewTaskRequest, UpdateTaskRequest};
use crate::automation::{
    domain::match_rules, ports::AutomationRuleRepository, services::EffectApplier,
};
use crate::notification::{ports::NotificationRepository, services::NotificationComposer};
use crate::task::{
    domain::{Comment, Project, ProjectId, Task, TaskChange, TaskDomainError, TaskId, policy},
    ports::{ProjectRepository, ProjectRepositoryError, TaskRepository, TaskRepositoryError},
};
use crate::user::{domain::UserId, ports::UserRepository};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Project repository operation failed.
    #[error(transparent)]
    ProjectRepository(#[from] ProjectRepositoryError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Mutations are validated by the status policy and persisted before any
/// automation runs. Automation failures after persistence are logged and
/// never change the outcome of the mutation.
#[derive(Clone)]
pub struct TaskLifecycleService<T, P, R, U, N, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    R: AutomationRuleRepository,
    U: UserRepository,
    N: NotificationRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    projects: Arc<P>,
    rules: Arc<R>,
    applier: EffectApplier<T, U, N, C>,
    clock: Arc<C>,
}

impl<T, P, R, U, N, C> TaskLifecycleService<T, P, R, U, N, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    R: AutomationRuleRepository,
    U: UserRepository,
    N: NotificationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub fn new(
        tasks: Arc<T>,
        projects: Arc<P>,
        rules: Arc<R>,
        users: Arc<U>,
        notifications: Arc<N>,
        clock: Arc<C>,
    ) -> Self {
        let applier = EffectApplier::new(
            Arc::clone(&tasks),
            users,
            notifications,
            Arc::clone(&clock),
        );
        Self {
            tasks,
            projects,
            rules,
            applier,
            clock,
        }
    }

    /// Uses `composer` to render automation notifications.
    #[must_use]
    pub fn with_composer(mut self, composer: NotificationComposer) -> Self {
        self.applier = self.applier.with_composer(composer);
        self
    }

    /// Creates a task in `project` on behalf of `caller`.
    ///
    /// An assigned task starts "In Progress" unless another status was
    /// requested. Automation runs as if the task had no prior state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::ProjectNotFound`] for unknown projects
    /// and [`TaskLifecycleError::Domain`] for blank or duplicate titles and
    /// statuses outside the project's pipeline.
    pub async fn create_task(
        &self,
        project: ProjectId,
        request: NewTaskRequest,
        caller: UserId,
    ) -> TaskLifecycleResult<Task> {
        let owner_project = self.existing_project(project).await?;
        let creation = policy::validate_creation(&owner_project, request.into_draft()?)?;
        self.ensure_title_available(project, creation.title(), None)
            .await?;

        let task = Task::create(project, creation, caller, &*self.clock);
        self.tasks.store(&task).await.map_err(conflict_as_domain)?;
        debug!(task_id = %task.id(), %project, %caller, "task created");

        let change = TaskChange::creation(task.status().clone(), task.assignee());
        Ok(self.run_automation(&change, task, &owner_project).await)
    }

    /// Applies `request` to an existing task on behalf of `caller`.
    ///
    /// Returns the task as persisted, including any status forced by
    /// automation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for unknown tasks and
    /// [`TaskLifecycleError::Domain`] when the status policy rejects the
    /// change or the new title is taken.
    pub async fn update_task(
        &self,
        task_id: TaskId,
        request: UpdateTaskRequest,
        caller: UserId,
    ) -> TaskLifecycleResult<Task> {
        let task = self.existing_task(task_id).await?;
        let project = self.existing_project(task.project()).await?;

        let validated = policy::validate_update(&task, &project, request.into_patch()?)
            .inspect_err(|err| debug!(%task_id, %caller, %err, "task update rejected"))?;
        if let Some(title) = validated.title().filter(|title| *title != task.title()) {
            self.ensure_title_available(project.id(), title, Some(task_id))
                .await?;
        }

        let mut updated = task;
        let change = updated.apply(validated, &*self.clock);
        self.tasks
            .update(&updated)
            .await
            .map_err(conflict_as_domain)?;
        debug!(
            %task_id,
            %caller,
            status = %updated.status(),
            "task updated"
        );

        Ok(self.run_automation(&change, updated, &project).await)
    }

    /// Deletes a task that is not yet done.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for unknown tasks and
    /// [`TaskDomainError::DoneTaskImmutable`] for done tasks.
    pub async fn delete_task(&self, task_id: TaskId, caller: UserId) -> TaskLifecycleResult<()> {
        let task = self.existing_task(task_id).await?;
        task.ensure_deletable()
            .inspect_err(|err| debug!(%task_id, %caller, %err, "task deletion rejected"))?;
        self.tasks.delete(task_id).await?;
        debug!(%task_id, %caller, "task deleted");
        Ok(())
    }

    /// Appends a comment by `caller` to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for unknown tasks and
    /// [`TaskDomainError::EmptyComment`] for blank text.
    pub async fn add_comment(
        &self,
        task_id: TaskId,
        caller: UserId,
        text: impl Into<String> + Send,
    ) -> TaskLifecycleResult<Comment> {
        let mut task = self.existing_task(task_id).await?;
        let comment = task.add_comment(caller, text, &*self.clock)?;
        self.tasks.update(&task).await?;
        Ok(comment)
    }

    /// Returns a task's comments in posting order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for unknown tasks.
    pub async fn list_comments(&self, task_id: TaskId) -> TaskLifecycleResult<Vec<Comment>> {
        let task = self.existing_task(task_id).await?;
        Ok(task.comments().to_vec())
    }

    /// Returns a project's tasks in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::ProjectNotFound`] for unknown projects.
    pub async fn list_project_tasks(&self, project: ProjectId) -> TaskLifecycleResult<Vec<Task>> {
        self.existing_project(project).await?;
        Ok(self.tasks.find_by_project(project).await?)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn find_task(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.tasks.find_by_id(task_id).await?)
    }

    async fn existing_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }

    async fn existing_project(&self, project: ProjectId) -> TaskLifecycleResult<Project> {
        self.projects
            .find_by_id(project)
            .await?
            .ok_or(TaskLifecycleError::ProjectNotFound(project))
    }

    async fn ensure_title_available(
        &self,
        project: ProjectId,
        title: &str,
        renaming: Option<TaskId>,
    ) -> TaskLifecycleResult<()> {
        let holder = self.tasks.find_by_project_and_title(project, title).await?;
        match holder {
            Some(existing) if Some(existing.id()) != renaming => {
                Err(TaskLifecycleError::Domain(TaskDomainError::DuplicateTitle {
                    title: title.to_owned(),
                    project,
                }))
            }
            _ => Ok(()),
        }
    }

    async fn run_automation(&self, change: &TaskChange, task: Task, project: &Project) -> Task {
        let rules = match self.rules.find_by_project(project.id()).await {
            Ok(rules) => rules,
            Err(err) => {
                warn!(task_id = %task.id(), %err, "automation rules unavailable");
                Vec::new()
            }
        };
        let effects = match_rules(change, &task, &rules);
        if effects.is_empty() {
            return task;
        }

        let report = self.applier.apply(effects, task, project).await;
        let failures = report.failure_count();
        if failures > 0 {
            warn!(
                task_id = %report.task().id(),
                failures,
                "automation finished with failed effects"
            );
        }
        report.into_task()
    }
}

fn conflict_as_domain(err: TaskRepositoryError) -> TaskLifecycleError {
    match err {
        TaskRepositoryError::DuplicateTitle { project, title } => {
            TaskLifecycleError::Domain(TaskDomainError::DuplicateTitle { title, project })
        }
        other => TaskLifecycleError::Repository(other),
    }
}
