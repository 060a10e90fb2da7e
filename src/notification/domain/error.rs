//! Error types for notification parsing.

use thiserror::Error;

/// Error returned while parsing notification kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown notification kind: {0}")]
pub struct ParseNotificationKindError(pub String);
