//! `PostgreSQL` adapter for automation rule persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresAutomationRuleRepository;
