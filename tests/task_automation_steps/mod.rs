//! Step definitions for task automation scenarios.

mod given;
mod then;
mod when;
pub mod world;
