//! `PostgreSQL` repository implementation for automation rules.

use super::{models::AutomationRuleRow, schema::automation_rules};
use crate::automation::{
    domain::{AutomationRule, RuleDefinition, RuleId, StoredRule},
    ports::{
        AutomationRuleRepository, AutomationRuleRepositoryError, AutomationRuleRepositoryResult,
    },
};
use crate::persistence::{PersistenceFailure, PgPool, run_blocking};
use crate::task::domain::ProjectId;
use crate::user::domain::UserId;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed automation rule repository.
#[derive(Debug, Clone)]
pub struct PostgresAutomationRuleRepository {
    pool: PgPool,
}

impl PostgresAutomationRuleRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PersistenceFailure for AutomationRuleRepositoryError {
    fn from_persistence<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::persistence(err)
    }
}

#[async_trait]
impl AutomationRuleRepository for PostgresAutomationRuleRepository {
    async fn store(&self, rule: &AutomationRule) -> AutomationRuleRepositoryResult<()> {
        let rule_id = rule.id();
        let row = to_row(rule);

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(automation_rules::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        AutomationRuleRepositoryError::DuplicateRule(rule_id)
                    }
                    _ => AutomationRuleRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, rule: &AutomationRule) -> AutomationRuleRepositoryResult<()> {
        let rule_id = rule.id();
        let definition = rule.definition().clone();

        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(
                automation_rules::table.filter(automation_rules::id.eq(rule_id.into_inner())),
            )
            .set((
                automation_rules::trigger.eq(definition.trigger),
                automation_rules::condition.eq(definition.condition),
                automation_rules::action.eq(definition.action),
            ))
            .execute(connection)
            .map_err(AutomationRuleRepositoryError::persistence)?;
            if updated == 0 {
                return Err(AutomationRuleRepositoryError::NotFound(rule_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: RuleId) -> AutomationRuleRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let deleted = diesel::delete(
                automation_rules::table.filter(automation_rules::id.eq(id.into_inner())),
            )
            .execute(connection)
            .map_err(AutomationRuleRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(AutomationRuleRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: RuleId,
    ) -> AutomationRuleRepositoryResult<Option<AutomationRule>> {
        run_blocking(&self.pool, move |connection| {
            let row = automation_rules::table
                .filter(automation_rules::id.eq(id.into_inner()))
                .select(AutomationRuleRow::as_select())
                .first::<AutomationRuleRow>(connection)
                .optional()
                .map_err(AutomationRuleRepositoryError::persistence)?;
            Ok(row.map(row_to_rule))
        })
        .await
    }

    async fn find_by_project(
        &self,
        project: ProjectId,
    ) -> AutomationRuleRepositoryResult<Vec<AutomationRule>> {
        run_blocking(&self.pool, move |connection| {
            let rows = automation_rules::table
                .filter(automation_rules::project_id.eq(project.into_inner()))
                .order((automation_rules::created_at.asc(), automation_rules::id.asc()))
                .select(AutomationRuleRow::as_select())
                .load::<AutomationRuleRow>(connection)
                .map_err(AutomationRuleRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_rule).collect())
        })
        .await
    }
}

fn to_row(rule: &AutomationRule) -> AutomationRuleRow {
    let definition = rule.definition().clone();
    AutomationRuleRow {
        id: rule.id().into_inner(),
        project_id: rule.project().into_inner(),
        trigger: definition.trigger,
        condition: definition.condition,
        action: definition.action,
        created_by: rule.created_by().into_inner(),
        created_at: rule.created_at(),
    }
}

fn row_to_rule(row: AutomationRuleRow) -> AutomationRule {
    AutomationRule::from_stored(StoredRule {
        id: RuleId::from_uuid(row.id),
        project: ProjectId::from_uuid(row.project_id),
        definition: RuleDefinition {
            trigger: row.trigger,
            condition: row.condition,
            action: row.action,
        },
        created_by: UserId::from_uuid(row.created_by),
        created_at: row.created_at,
    })
}
