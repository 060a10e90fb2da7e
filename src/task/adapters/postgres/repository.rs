//! `PostgreSQL` repository implementation for task storage.

use super::{models::TaskRow, schema::tasks};
use crate::persistence::{PersistenceFailure, PgPool, run_blocking};
use crate::task::{
    domain::{Comment, PersistedTaskData, ProjectId, Task, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

const TITLE_UNIQUE_CONSTRAINT: &str = "tasks_project_id_title_key";

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PersistenceFailure for TaskRepositoryError {
    fn from_persistence<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let project = task.project();
        let title = task.title().to_owned();
        let row = to_row(task)?;

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_title_unique_violation(info.as_ref()) =>
                    {
                        TaskRepositoryError::DuplicateTitle {
                            project,
                            title: title.clone(),
                        }
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let project = task.project();
        let title = task.title().to_owned();
        let row = to_row(task)?;

        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                .set(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_title_unique_violation(info.as_ref()) =>
                    {
                        TaskRepositoryError::DuplicateTitle {
                            project,
                            title: title.clone(),
                        }
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        run_blocking(&self.pool, move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_by_project(&self, project: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        run_blocking(&self.pool, move |connection| {
            let rows = tasks::table
                .filter(tasks::project_id.eq(project.into_inner()))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_by_project_and_title(
        &self,
        project: ProjectId,
        title: &str,
    ) -> TaskRepositoryResult<Option<Task>> {
        let lookup_title = title.to_owned();
        run_blocking(&self.pool, move |connection| {
            let row = tasks::table
                .filter(tasks::project_id.eq(project.into_inner()))
                .filter(tasks::title.eq(lookup_title))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_overdue_open(&self, now: DateTime<Utc>) -> TaskRepositoryResult<Vec<Task>> {
        let done = TaskStatus::done().as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let rows = tasks::table
                .filter(tasks::due_date.lt(now))
                .filter(tasks::status.ne(done))
                .order(tasks::due_date.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_row(task: &Task) -> TaskRepositoryResult<TaskRow> {
    let comments =
        serde_json::to_value(task.comments()).map_err(TaskRepositoryError::persistence)?;

    Ok(TaskRow {
        id: task.id().into_inner(),
        project_id: task.project().into_inner(),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        due_date: task.due_date(),
        status: task.status().as_str().to_owned(),
        assignee_id: task.assignee().map(UserId::into_inner),
        created_by: task.created_by().into_inner(),
        comments,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        project_id,
        title,
        description,
        due_date,
        status: persisted_status,
        assignee_id,
        created_by,
        comments: persisted_comments,
        created_at,
        updated_at,
    } = row;

    let status = TaskStatus::new(persisted_status).map_err(TaskRepositoryError::persistence)?;
    let comments = serde_json::from_value::<Vec<Comment>>(persisted_comments)
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        project: ProjectId::from_uuid(project_id),
        title,
        description,
        due_date,
        status,
        assignee: assignee_id.map(UserId::from_uuid),
        created_by: UserId::from_uuid(created_by),
        comments,
        created_at,
        updated_at,
    }))
}

fn is_title_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == TITLE_UNIQUE_CONSTRAINT)
}
