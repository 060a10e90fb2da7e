//! `PostgreSQL` adapters for task and project persistence.

mod models;
mod project;
mod repository;
mod schema;

pub use project::PostgresProjectRepository;
pub use repository::PostgresTaskRepository;
