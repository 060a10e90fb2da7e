//! Diesel row models for user persistence.

use super::schema::{user_badges, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for badge grants.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_badges)]
pub struct NewUserBadgeRow {
    /// Owning user identifier.
    pub user_id: uuid::Uuid,
    /// Badge label.
    pub label: String,
    /// Grant timestamp.
    pub granted_at: DateTime<Utc>,
}
