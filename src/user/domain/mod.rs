//! Domain model for users and badges.

mod badge;
mod error;
mod ids;
mod user;

pub use badge::{Badge, BadgeGrant};
pub use error::UserDomainError;
pub use ids::UserId;
pub use user::{PersistedUserData, User};
