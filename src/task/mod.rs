//! Task lifecycle management for the board.
//!
//! Tasks move through their project's status pipeline under the rules of the
//! status policy. Every accepted mutation is persisted first and then handed
//! to the automation engine, which may grant badges, force a follow-up
//! status, and notify the assignee. A due-date sweeper notifies assignees of
//! open tasks past their due date. The module follows hexagonal architecture:
//!
//! - Domain types and the status policy in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
