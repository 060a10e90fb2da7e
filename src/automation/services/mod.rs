//! Application services for automation.

mod applier;
mod rules;

pub use applier::{ApplyReport, EffectApplier};
pub use rules::{AutomationRuleService, AutomationRuleServiceError, AutomationRuleServiceResult};
