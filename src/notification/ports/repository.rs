//! Repository port for the per-recipient notification store.

use crate::notification::domain::{Notification, NotificationId, NotificationKind};
use crate::task::domain::TaskId;
use crate::user::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification repository operations.
pub type NotificationRepositoryResult<T> = Result<T, NotificationRepositoryError>;

/// Append-only notification store keyed by recipient.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Appends a notification to its recipient's inbox.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationRepositoryError::DuplicateNotification`] when the
    /// identifier already exists.
    async fn append(&self, notification: &Notification) -> NotificationRepositoryResult<()>;

    /// Returns the recipient's notifications, newest first.
    async fn list_for_recipient(
        &self,
        recipient: UserId,
    ) -> NotificationRepositoryResult<Vec<Notification>>;

    /// Returns the newest notification of `kind` sent to `recipient` about
    /// `task`.
    async fn latest_for_task(
        &self,
        recipient: UserId,
        task: TaskId,
        kind: NotificationKind,
    ) -> NotificationRepositoryResult<Option<Notification>>;
}

/// Errors returned by notification repository implementations.
#[derive(Debug, Clone, Error)]
pub enum NotificationRepositoryError {
    /// A notification with the same identifier already exists.
    #[error("duplicate notification identifier: {0}")]
    DuplicateNotification(NotificationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
