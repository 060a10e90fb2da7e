//! Error types for automation rule validation.

use crate::task::domain::{ProjectId, TaskDomainError};
use crate::user::domain::UserDomainError;
use thiserror::Error;

/// Errors returned while validating automation rule definitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AutomationDomainError {
    /// The trigger is not one the engine understands.
    #[error("unknown automation trigger '{0}'")]
    UnknownTrigger(String),

    /// The action type is not one the engine understands.
    #[error("unknown automation action '{0}'")]
    UnknownAction(String),

    /// The trigger and action are individually known but cannot be combined.
    #[error("action '{action}' cannot run on trigger '{trigger}'")]
    UnsupportedCombination {
        /// Requested trigger.
        trigger: String,
        /// Requested action type.
        action: String,
    },

    /// An assignment rule names no user in its condition.
    #[error("assignment rules require a condition user")]
    MissingConditionUser,

    /// The definition payload does not have the expected shape.
    #[error("malformed automation definition: {0}")]
    MalformedDefinition(String),

    /// The target status is not part of the project's pipeline.
    #[error("status '{status}' is not configured for project {project}")]
    StatusNotInPipeline {
        /// Rejected status label.
        status: String,
        /// Project whose pipeline was consulted.
        project: ProjectId,
    },

    /// The badge label is invalid.
    #[error(transparent)]
    InvalidBadge(#[from] UserDomainError),

    /// The status label is invalid.
    #[error(transparent)]
    InvalidStatus(#[from] TaskDomainError),
}
