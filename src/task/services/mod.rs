//! Application services for task lifecycle orchestration.

mod lifecycle;
mod requests;
mod sweeper;

pub use lifecycle::{TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService};
pub use requests::{NewTaskRequest, UpdateTaskRequest};
pub use sweeper::{DueDateSweepError, DueDateSweeper, SweepPolicy, SweepReport};
