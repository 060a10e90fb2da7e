//! Diesel row models for task and project persistence.

use super::schema::{projects, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Row for task records, used for reads and writes.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Trimmed title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Status label.
    pub status: String,
    /// Optional assignee.
    pub assignee_id: Option<uuid::Uuid>,
    /// Creating user.
    pub created_by: uuid::Uuid,
    /// Comments JSON payload.
    pub comments: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of entry into "Done".
    pub updated_at: Option<DateTime<Utc>>,
}

/// Row for project records, used for reads and writes.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Trimmed title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Owning user.
    pub owner_id: uuid::Uuid,
    /// Members JSON payload.
    pub members: Value,
    /// Status labels JSON payload.
    pub statuses: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
