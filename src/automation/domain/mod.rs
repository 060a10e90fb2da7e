//! Domain model for project automation.
//!
//! Rules are stored in a loose wire form ([`RuleDefinition`]) and interpreted
//! as a closed set of behaviours ([`RuleBehaviour`]). The [`matcher`] turns a
//! task change plus the project's rules into an ordered list of [`Effect`]s
//! without performing any I/O.

mod effect;
mod error;
mod ids;
pub mod matcher;
mod rule;

pub use effect::{AppliedEffect, Effect, EffectOutcome};
pub use error::AutomationDomainError;
pub use ids::RuleId;
pub use matcher::match_rules;
pub use rule::{AutomationRule, RuleBehaviour, RuleDefinition, StoredRule};
