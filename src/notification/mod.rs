//! Per-recipient notification inbox.
//!
//! Notifications are append-only records addressed to a single user. They are
//! produced by task automation and the due-date sweeper, read by polling, and
//! never mutated. Message text comes from configurable `minijinja` templates.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Message composition in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
