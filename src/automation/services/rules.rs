//! Owner-only management of a project's automation rules.

use crate::automation::{
    domain::{AutomationDomainError, AutomationRule, RuleDefinition, RuleId},
    ports::{AutomationRuleRepository, AutomationRuleRepositoryError},
};
use crate::task::{
    domain::{Project, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::user::domain::UserId;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Service-level errors for automation rule management.
#[derive(Debug, Error)]
pub enum AutomationRuleServiceError {
    /// The definition was rejected.
    #[error(transparent)]
    Domain(#[from] AutomationDomainError),
    /// Rule repository operation failed.
    #[error(transparent)]
    Repository(#[from] AutomationRuleRepositoryError),
    /// Project repository operation failed.
    #[error(transparent)]
    ProjectRepository(#[from] ProjectRepositoryError),
    /// The rule does not exist.
    #[error("automation rule not found: {0}")]
    RuleNotFound(RuleId),
    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    /// The caller does not own the project.
    #[error("user {user} does not own project {project}")]
    AccessDenied {
        /// Calling user.
        user: UserId,
        /// Project the caller tried to manage.
        project: ProjectId,
    },
}

/// Result type for automation rule management.
pub type AutomationRuleServiceResult<T> = Result<T, AutomationRuleServiceError>;

/// Creates, edits, removes, and lists automation rules on behalf of a
/// project owner.
#[derive(Clone)]
pub struct AutomationRuleService<R, P, C>
where
    R: AutomationRuleRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    rules: Arc<R>,
    projects: Arc<P>,
    clock: Arc<C>,
}

impl<R, P, C> AutomationRuleService<R, P, C>
where
    R: AutomationRuleRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new rule management service.
    #[must_use]
    pub const fn new(rules: Arc<R>, projects: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            rules,
            projects,
            clock,
        }
    }

    /// Adds a rule to `project`.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationRuleServiceError::AccessDenied`] unless `caller`
    /// owns the project, and [`AutomationRuleServiceError::Domain`] when the
    /// definition is invalid.
    pub async fn create_rule(
        &self,
        project: ProjectId,
        definition: RuleDefinition,
        caller: UserId,
    ) -> AutomationRuleServiceResult<AutomationRule> {
        let owned = self.owned_project(project, caller).await?;
        let rule = AutomationRule::new(&owned, definition, caller, &*self.clock)?;
        self.rules.store(&rule).await?;
        debug!(rule_id = %rule.id(), %project, "automation rule created");
        Ok(rule)
    }

    /// Replaces a rule's definition.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationRuleServiceError::RuleNotFound`] for unknown
    /// rules, [`AutomationRuleServiceError::AccessDenied`] unless `caller`
    /// owns the rule's project, and [`AutomationRuleServiceError::Domain`]
    /// when the definition is invalid.
    pub async fn update_rule(
        &self,
        rule_id: RuleId,
        definition: RuleDefinition,
        caller: UserId,
    ) -> AutomationRuleServiceResult<AutomationRule> {
        let mut rule = self.existing_rule(rule_id).await?;
        let owned = self.owned_project(rule.project(), caller).await?;
        rule.redefine(&owned, definition)?;
        self.rules.update(&rule).await?;
        debug!(%rule_id, "automation rule updated");
        Ok(rule)
    }

    /// Removes a rule.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationRuleServiceError::RuleNotFound`] for unknown rules
    /// and [`AutomationRuleServiceError::AccessDenied`] unless `caller` owns
    /// the rule's project.
    pub async fn delete_rule(
        &self,
        rule_id: RuleId,
        caller: UserId,
    ) -> AutomationRuleServiceResult<()> {
        let rule = self.existing_rule(rule_id).await?;
        self.owned_project(rule.project(), caller).await?;
        self.rules.delete(rule_id).await?;
        debug!(%rule_id, "automation rule deleted");
        Ok(())
    }

    /// Lists a project's rules in evaluation order.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationRuleServiceError::AccessDenied`] unless `caller`
    /// owns the project.
    pub async fn list_rules(
        &self,
        project: ProjectId,
        caller: UserId,
    ) -> AutomationRuleServiceResult<Vec<AutomationRule>> {
        self.owned_project(project, caller).await?;
        Ok(self.rules.find_by_project(project).await?)
    }

    async fn existing_rule(&self, rule_id: RuleId) -> AutomationRuleServiceResult<AutomationRule> {
        self.rules
            .find_by_id(rule_id)
            .await?
            .ok_or(AutomationRuleServiceError::RuleNotFound(rule_id))
    }

    async fn owned_project(
        &self,
        project: ProjectId,
        caller: UserId,
    ) -> AutomationRuleServiceResult<Project> {
        let found = self
            .projects
            .find_by_id(project)
            .await?
            .ok_or(AutomationRuleServiceError::ProjectNotFound(project))?;
        if !found.is_owner(caller) {
            return Err(AutomationRuleServiceError::AccessDenied {
                user: caller,
                project,
            });
        }
        Ok(found)
    }
}
