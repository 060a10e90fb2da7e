//! Repository port for automation rules.

use crate::automation::domain::{AutomationRule, RuleId};
use crate::task::domain::ProjectId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for automation rule repository operations.
pub type AutomationRuleRepositoryResult<T> = Result<T, AutomationRuleRepositoryError>;

/// Automation rule persistence contract.
#[async_trait]
pub trait AutomationRuleRepository: Send + Sync {
    /// Stores a new rule.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationRuleRepositoryError::DuplicateRule`] when the ID
    /// already exists.
    async fn store(&self, rule: &AutomationRule) -> AutomationRuleRepositoryResult<()>;

    /// Replaces the definition of an existing rule.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationRuleRepositoryError::NotFound`] when the rule does
    /// not exist.
    async fn update(&self, rule: &AutomationRule) -> AutomationRuleRepositoryResult<()>;

    /// Removes a rule.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationRuleRepositoryError::NotFound`] when the rule does
    /// not exist.
    async fn delete(&self, id: RuleId) -> AutomationRuleRepositoryResult<()>;

    /// Finds a rule by identifier.
    async fn find_by_id(
        &self,
        id: RuleId,
    ) -> AutomationRuleRepositoryResult<Option<AutomationRule>>;

    /// Returns the project's rules in stored (creation) order.
    async fn find_by_project(
        &self,
        project: ProjectId,
    ) -> AutomationRuleRepositoryResult<Vec<AutomationRule>>;
}

/// Errors returned by automation rule repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AutomationRuleRepositoryError {
    /// A rule with the same identifier already exists.
    #[error("duplicate automation rule identifier: {0}")]
    DuplicateRule(RuleId),

    /// The rule was not found.
    #[error("automation rule not found: {0}")]
    NotFound(RuleId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AutomationRuleRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
