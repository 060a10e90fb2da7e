//! User aggregate root.

use super::{Badge, BadgeGrant, UserDomainError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A board user with the badges they have earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    badges: BTreeSet<Badge>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted display name.
    pub name: String,
    /// Persisted email address.
    pub email: String,
    /// Persisted badge labels.
    pub badges: BTreeSet<Badge>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a user with no badges.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::InvalidEmail`] when the email is blank or
    /// has no `@`.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, UserDomainError> {
        let raw_email = email.into();
        let trimmed_email = raw_email.trim();
        if trimmed_email.is_empty() || !trimmed_email.contains('@') {
            return Err(UserDomainError::InvalidEmail(raw_email));
        }

        Ok(Self {
            id: UserId::new(),
            name: name.into().trim().to_owned(),
            email: trimmed_email.to_owned(),
            badges: BTreeSet::new(),
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            email: data.email,
            badges: data.badges,
            created_at: data.created_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the badges held by this user.
    #[must_use]
    pub const fn badges(&self) -> &BTreeSet<Badge> {
        &self.badges
    }

    /// Returns whether the user holds `badge`.
    #[must_use]
    pub fn has_badge(&self, badge: &Badge) -> bool {
        self.badges.contains(badge)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Grants a badge. Granting a badge the user already holds is a no-op.
    pub fn grant_badge(&mut self, badge: Badge) -> BadgeGrant {
        if self.badges.insert(badge) {
            BadgeGrant::Granted
        } else {
            BadgeGrant::AlreadyHeld
        }
    }
}
