//! Badge labels and grant outcomes.

use super::UserDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label granted when a badge rule does not name one.
const DEFAULT_BADGE_LABEL: &str = "Completed Task";

/// Achievement label held by a user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Badge(String);

impl Badge {
    /// Creates a validated badge label.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyBadge`] when the label is blank.
    pub fn new(label: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = label.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserDomainError::EmptyBadge);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the badge granted for task completion when no label is
    /// configured.
    #[must_use]
    pub fn completed_task() -> Self {
        Self(DEFAULT_BADGE_LABEL.to_owned())
    }

    /// Returns the badge label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Badge {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Outcome of granting a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeGrant {
    /// The user did not hold the badge and now does.
    Granted,
    /// The user already held the badge; nothing changed.
    AlreadyHeld,
}
