//! Project automation: rules that react to task changes.
//!
//! Project owners configure rules that grant badges when tasks are completed
//! and move tasks along the pipeline when they are assigned to particular
//! users. The module follows hexagonal architecture:
//!
//! - Domain types and the pure rule matcher in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Effect application and rule management in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
