//! In-memory task and project adapters.

mod project;
mod task;

pub use project::InMemoryProjectRepository;
pub use task::InMemoryTaskRepository;
