//! Port contracts for notification delivery.

pub mod repository;

pub use repository::{
    NotificationRepository, NotificationRepositoryError, NotificationRepositoryResult,
};
