//! Port contracts for user storage and badge grants.

pub mod repository;

pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
