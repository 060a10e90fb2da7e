//! In-memory repository for projects.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Project, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};

/// Thread-safe in-memory project repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    state: Arc<RwLock<HashMap<ProjectId, Project>>>,
}

impl InMemoryProjectRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> ProjectRepositoryError {
    ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut projects = self.state.write().map_err(lock_error)?;
        if projects.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::DuplicateProject(project.id()));
        }
        let title_taken = projects.values().any(|existing| {
            existing.owner() == project.owner() && existing.title() == project.title()
        });
        if title_taken {
            return Err(ProjectRepositoryError::DuplicateTitle {
                owner: project.owner(),
                title: project.title().to_owned(),
            });
        }
        projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let projects = self.state.read().map_err(lock_error)?;
        Ok(projects.get(&id).cloned())
    }
}
