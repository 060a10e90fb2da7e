//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod project;
pub mod repository;

pub use project::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
