//! `PostgreSQL` repository implementation for notifications.

use super::{models::NotificationRow, schema::notifications};
use crate::notification::{
    domain::{Notification, NotificationId, NotificationKind, PersistedNotificationData},
    ports::{NotificationRepository, NotificationRepositoryError, NotificationRepositoryResult},
};
use crate::persistence::{PersistenceFailure, PgPool, run_blocking};
use crate::task::domain::TaskId;
use crate::user::domain::UserId;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed notification repository.
#[derive(Debug, Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PersistenceFailure for NotificationRepositoryError {
    fn from_persistence<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::persistence(err)
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn append(&self, notification: &Notification) -> NotificationRepositoryResult<()> {
        let notification_id = notification.id();
        let row = to_row(notification);

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(notifications::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        NotificationRepositoryError::DuplicateNotification(notification_id)
                    }
                    _ => NotificationRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn list_for_recipient(
        &self,
        recipient: UserId,
    ) -> NotificationRepositoryResult<Vec<Notification>> {
        run_blocking(&self.pool, move |connection| {
            let rows = notifications::table
                .filter(notifications::recipient_id.eq(recipient.into_inner()))
                .order(notifications::created_at.desc())
                .select(NotificationRow::as_select())
                .load::<NotificationRow>(connection)
                .map_err(NotificationRepositoryError::persistence)?;
            rows.into_iter().map(row_to_notification).collect()
        })
        .await
    }

    async fn latest_for_task(
        &self,
        recipient: UserId,
        task: TaskId,
        kind: NotificationKind,
    ) -> NotificationRepositoryResult<Option<Notification>> {
        run_blocking(&self.pool, move |connection| {
            let row = notifications::table
                .filter(notifications::recipient_id.eq(recipient.into_inner()))
                .filter(notifications::task_id.eq(task.into_inner()))
                .filter(notifications::kind.eq(kind.as_str()))
                .order(notifications::created_at.desc())
                .select(NotificationRow::as_select())
                .first::<NotificationRow>(connection)
                .optional()
                .map_err(NotificationRepositoryError::persistence)?;
            row.map(row_to_notification).transpose()
        })
        .await
    }
}

fn to_row(notification: &Notification) -> NotificationRow {
    NotificationRow {
        id: notification.id().into_inner(),
        recipient_id: notification.recipient().into_inner(),
        task_id: notification.task().map(TaskId::into_inner),
        kind: notification.kind().as_str().to_owned(),
        message: notification.message().to_owned(),
        created_at: notification.created_at(),
    }
}

fn row_to_notification(row: NotificationRow) -> NotificationRepositoryResult<Notification> {
    let kind = NotificationKind::try_from(row.kind.as_str())
        .map_err(NotificationRepositoryError::persistence)?;
    Ok(Notification::from_persisted(PersistedNotificationData {
        id: NotificationId::from_uuid(row.id),
        recipient: UserId::from_uuid(row.recipient_id),
        task: row.task_id.map(TaskId::from_uuid),
        kind,
        message: row.message,
        created_at: row.created_at,
    }))
}
