//! Users and the badges they earn.
//!
//! Badges are achievement labels granted by task automation. Granting is
//! idempotent: a user holds each label at most once. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
