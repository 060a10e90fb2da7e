//! `PostgreSQL` repository implementation for projects.

use super::{models::ProjectRow, schema::projects};
use crate::persistence::{PersistenceFailure, PgPool, run_blocking};
use crate::task::{
    domain::{PersistedProjectData, Project, ProjectId, StatusPipeline},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::BTreeSet;

const OWNER_TITLE_UNIQUE_CONSTRAINT: &str = "projects_owner_id_title_key";

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PersistenceFailure for ProjectRepositoryError {
    fn from_persistence<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::persistence(err)
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let owner = project.owner();
        let title = project.title().to_owned();
        let row = to_row(project)?;

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(projects::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if info.constraint_name() == Some(OWNER_TITLE_UNIQUE_CONSTRAINT) =>
                    {
                        ProjectRepositoryError::DuplicateTitle {
                            owner,
                            title: title.clone(),
                        }
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ProjectRepositoryError::DuplicateProject(project_id)
                    }
                    _ => ProjectRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        run_blocking(&self.pool, move |connection| {
            let row = projects::table
                .filter(projects::id.eq(id.into_inner()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_project).transpose()
        })
        .await
    }
}

fn to_row(project: &Project) -> ProjectRepositoryResult<ProjectRow> {
    let members =
        serde_json::to_value(project.members()).map_err(ProjectRepositoryError::persistence)?;
    let statuses =
        serde_json::to_value(project.statuses()).map_err(ProjectRepositoryError::persistence)?;

    Ok(ProjectRow {
        id: project.id().into_inner(),
        title: project.title().to_owned(),
        description: project.description().map(str::to_owned),
        owner_id: project.owner().into_inner(),
        members,
        statuses,
        created_at: project.created_at(),
    })
}

fn row_to_project(row: ProjectRow) -> ProjectRepositoryResult<Project> {
    let members = serde_json::from_value::<BTreeSet<UserId>>(row.members)
        .map_err(ProjectRepositoryError::persistence)?;
    let statuses = serde_json::from_value::<StatusPipeline>(row.statuses)
        .map_err(ProjectRepositoryError::persistence)?;

    Ok(Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        owner: UserId::from_uuid(row.owner_id),
        members,
        statuses,
        created_at: row.created_at,
    }))
}
