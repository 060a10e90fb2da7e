//! Diesel row models for notification persistence.

use super::schema::notifications;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for notification records, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    /// Notification identifier.
    pub id: uuid::Uuid,
    /// Recipient user identifier.
    pub recipient_id: uuid::Uuid,
    /// Task reference, if any.
    pub task_id: Option<uuid::Uuid>,
    /// Notification kind.
    pub kind: String,
    /// Rendered message.
    pub message: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
