//! In-memory repository for automation rules.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::automation::{
    domain::{AutomationRule, RuleId},
    ports::{
        AutomationRuleRepository, AutomationRuleRepositoryError, AutomationRuleRepositoryResult,
    },
};
use crate::task::domain::ProjectId;

/// Thread-safe in-memory automation rule repository.
///
/// Rules are kept in insertion order, which is the order the matcher
/// evaluates them in.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAutomationRuleRepository {
    state: Arc<RwLock<Vec<AutomationRule>>>,
}

impl InMemoryAutomationRuleRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> AutomationRuleRepositoryError {
    AutomationRuleRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl AutomationRuleRepository for InMemoryAutomationRuleRepository {
    async fn store(&self, rule: &AutomationRule) -> AutomationRuleRepositoryResult<()> {
        let mut rules = self.state.write().map_err(lock_error)?;
        if rules.iter().any(|existing| existing.id() == rule.id()) {
            return Err(AutomationRuleRepositoryError::DuplicateRule(rule.id()));
        }
        rules.push(rule.clone());
        Ok(())
    }

    async fn update(&self, rule: &AutomationRule) -> AutomationRuleRepositoryResult<()> {
        let mut rules = self.state.write().map_err(lock_error)?;
        let stored = rules
            .iter_mut()
            .find(|existing| existing.id() == rule.id())
            .ok_or(AutomationRuleRepositoryError::NotFound(rule.id()))?;
        *stored = rule.clone();
        Ok(())
    }

    async fn delete(&self, id: RuleId) -> AutomationRuleRepositoryResult<()> {
        let mut rules = self.state.write().map_err(lock_error)?;
        let before = rules.len();
        rules.retain(|existing| existing.id() != id);
        if rules.len() == before {
            return Err(AutomationRuleRepositoryError::NotFound(id));
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: RuleId,
    ) -> AutomationRuleRepositoryResult<Option<AutomationRule>> {
        let rules = self.state.read().map_err(lock_error)?;
        Ok(rules.iter().find(|rule| rule.id() == id).cloned())
    }

    async fn find_by_project(
        &self,
        project: ProjectId,
    ) -> AutomationRuleRepositoryResult<Vec<AutomationRule>> {
        let rules = self.state.read().map_err(lock_error)?;
        Ok(rules
            .iter()
            .filter(|rule| rule.project() == project)
            .cloned()
            .collect())
    }
}
