//! Side effects produced by rule matching and their application outcomes.

use crate::notification::domain::NotificationSubject;
use crate::task::domain::TaskStatus;
use crate::user::domain::{Badge, UserId};
use std::fmt;

/// A side effect requested by automation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Add `badge` to `user`'s badge set.
    GrantBadge {
        /// Recipient of the badge.
        user: UserId,
        /// Badge to grant.
        badge: Badge,
    },
    /// Move the triggering task to `status`.
    ForceStatus {
        /// Target status.
        status: TaskStatus,
    },
    /// Send a notification about the triggering task.
    Notify {
        /// Notification recipient.
        recipient: UserId,
        /// What the notification reports.
        subject: NotificationSubject,
    },
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GrantBadge { user, badge } => write!(f, "grant badge '{badge}' to {user}"),
            Self::ForceStatus { status } => write!(f, "force status '{status}'"),
            Self::Notify { recipient, subject } => {
                write!(f, "notify {recipient} ({})", subject.kind())
            }
        }
    }
}

/// Result of applying a single effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectOutcome {
    /// The effect took place, or was already in place.
    Applied,
    /// The effect was dropped because it is no longer legal.
    Skipped {
        /// Why the effect was dropped.
        reason: String,
    },
    /// The effect failed; later effects still ran.
    Failed {
        /// Failure description.
        reason: String,
    },
}

impl EffectOutcome {
    /// Returns whether the effect took place.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// Returns whether the effect failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// An effect paired with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedEffect {
    /// The requested effect.
    pub effect: Effect,
    /// What happened when it was applied.
    pub outcome: EffectOutcome,
}
