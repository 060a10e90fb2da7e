//! In-memory repository for task lifecycle tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{ProjectId, Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    insertion_order: Vec<TaskId>,
    title_index: HashMap<(ProjectId, String), TaskId>,
}

impl InMemoryTaskState {
    fn ordered(&self) -> impl Iterator<Item = &Task> {
        self.insertion_order
            .iter()
            .filter_map(|id| self.tasks.get(id))
    }

    fn title_taken_by_other(&self, task: &Task) -> bool {
        self.title_index
            .get(&title_key(task))
            .is_some_and(|holder| *holder != task.id())
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn title_key(task: &Task) -> (ProjectId, String) {
    (task.project(), task.title().to_owned())
}

fn duplicate_title(task: &Task) -> TaskRepositoryError {
    TaskRepositoryError::DuplicateTitle {
        project: task.project(),
        title: task.title().to_owned(),
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        if state.title_taken_by_other(task) {
            return Err(duplicate_title(task));
        }

        state.title_index.insert(title_key(task), task.id());
        state.insertion_order.push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let old_key = state
            .tasks
            .get(&task.id())
            .map(title_key)
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        if state.title_taken_by_other(task) {
            return Err(duplicate_title(task));
        }

        state.title_index.remove(&old_key);
        state.title_index.insert(title_key(task), task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let removed = state
            .tasks
            .remove(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        state.title_index.remove(&title_key(&removed));
        state.insertion_order.retain(|existing| *existing != id);
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_by_project(&self, project: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .ordered()
            .filter(|task| task.project() == project)
            .cloned()
            .collect())
    }

    async fn find_by_project_and_title(
        &self,
        project: ProjectId,
        title: &str,
    ) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let task = state
            .title_index
            .get(&(project, title.to_owned()))
            .and_then(|id| state.tasks.get(id))
            .cloned();
        Ok(task)
    }

    async fn find_overdue_open(&self, now: DateTime<Utc>) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .ordered()
            .filter(|task| task.is_overdue(now))
            .cloned()
            .collect())
    }
}
