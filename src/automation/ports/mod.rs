//! Port contracts for automation rule storage.

pub mod repository;

pub use repository::{
    AutomationRuleRepository, AutomationRuleRepositoryError, AutomationRuleRepositoryResult,
};
