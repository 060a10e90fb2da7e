//! Taskboard: task lifecycle and automation engine for team task tracking.
//!
//! This crate provides the core of a small team task board: tasks move
//! through a project-configured status pipeline, and project automation rules
//! react to task changes by granting badges, cascading statuses, and
//! notifying assignees.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`task`]: Status policy, task mutation orchestration, and due-date sweeps
//! - [`automation`]: Automation rules, rule matching, and effect application
//! - [`user`]: Users and idempotent badge grants
//! - [`notification`]: Per-recipient notification inbox and message templates
//! - [`persistence`]: Shared `PostgreSQL` pool and blocking-call helpers

pub mod automation;
pub mod notification;
pub mod persistence;
pub mod task;
pub mod user;
