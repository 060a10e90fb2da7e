//! Diesel row models for automation rule persistence.

use super::schema::automation_rules;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Row for automation rules, used for reads and writes.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = automation_rules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AutomationRuleRow {
    /// Rule identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Trigger name.
    pub trigger: String,
    /// Trigger condition payload.
    pub condition: Option<Value>,
    /// Action payload.
    pub action: Option<Value>,
    /// Creating user.
    pub created_by: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
