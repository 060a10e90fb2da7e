//! In-memory automation rule adapter.

mod rule;

pub use rule::InMemoryAutomationRuleRepository;
