//! `PostgreSQL` adapters for user and badge persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresUserRepository;
