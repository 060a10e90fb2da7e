//! In-memory per-recipient notification store.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::notification::{
    domain::{Notification, NotificationId, NotificationKind},
    ports::{NotificationRepository, NotificationRepositoryError, NotificationRepositoryResult},
};
use crate::task::domain::TaskId;
use crate::user::domain::UserId;

/// Thread-safe in-memory notification repository.
///
/// Each recipient owns an append-only inbox; there is no store-wide buffer.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationRepository {
    state: Arc<RwLock<InMemoryNotificationState>>,
}

#[derive(Debug, Default)]
struct InMemoryNotificationState {
    ids: HashSet<NotificationId>,
    inboxes: HashMap<UserId, Vec<Notification>>,
}

impl InMemoryNotificationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> NotificationRepositoryError {
    NotificationRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Returns the newest entry, preferring the later append on equal timestamps.
fn newest<'a>(entries: impl Iterator<Item = &'a Notification>) -> Option<&'a Notification> {
    entries.fold(None, |current: Option<&Notification>, candidate| match current {
        Some(best) if best.created_at() > candidate.created_at() => Some(best),
        _ => Some(candidate),
    })
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn append(&self, notification: &Notification) -> NotificationRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.ids.insert(notification.id()) {
            return Err(NotificationRepositoryError::DuplicateNotification(
                notification.id(),
            ));
        }
        state
            .inboxes
            .entry(notification.recipient())
            .or_default()
            .push(notification.clone());
        Ok(())
    }

    async fn list_for_recipient(
        &self,
        recipient: UserId,
    ) -> NotificationRepositoryResult<Vec<Notification>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut notifications: Vec<Notification> = state
            .inboxes
            .get(&recipient)
            .map(|inbox| inbox.iter().rev().cloned().collect())
            .unwrap_or_default();
        // Stable sort keeps later appends first among equal timestamps.
        notifications.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(notifications)
    }

    async fn latest_for_task(
        &self,
        recipient: UserId,
        task: TaskId,
        kind: NotificationKind,
    ) -> NotificationRepositoryResult<Option<Notification>> {
        let state = self.state.read().map_err(lock_error)?;
        let latest = state.inboxes.get(&recipient).and_then(|inbox| {
            newest(
                inbox
                    .iter()
                    .filter(|entry| entry.task() == Some(task) && entry.kind() == kind),
            )
        });
        Ok(latest.cloned())
    }
}
