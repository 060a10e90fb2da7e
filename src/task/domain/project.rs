//! Project aggregate: ownership, membership, and the status pipeline.

use super::{ProjectId, StatusPipeline, TaskDomainError};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A project groups tasks and defines the statuses they may take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    title: String,
    description: Option<String>,
    owner: UserId,
    members: BTreeSet<UserId>,
    statuses: StatusPipeline,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted owner.
    pub owner: UserId,
    /// Persisted members; the owner is added when absent.
    pub members: BTreeSet<UserId>,
    /// Persisted status pipeline.
    pub statuses: StatusPipeline,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a project owned by `owner` with the default pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyProjectTitle`] when the title is blank.
    pub fn new(
        title: impl Into<String>,
        owner: UserId,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyProjectTitle);
        }

        Ok(Self {
            id: ProjectId::new(),
            title: trimmed.to_owned(),
            description: None,
            owner,
            members: BTreeSet::from([owner]),
            statuses: StatusPipeline::default(),
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a project from persisted storage.
    ///
    /// The owner is always treated as a member.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        let mut members = data.members;
        members.insert(data.owner);
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            owner: data.owner,
            members,
            statuses: data.statuses,
            created_at: data.created_at,
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the status pipeline.
    #[must_use]
    pub fn with_statuses(mut self, statuses: StatusPipeline) -> Self {
        self.statuses = statuses;
        self
    }

    /// Adds a member. Adding an existing member is a no-op.
    pub fn add_member(&mut self, member: UserId) {
        self.members.insert(member);
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the project description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the owner.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns whether `user` owns the project.
    #[must_use]
    pub fn is_owner(&self, user: UserId) -> bool {
        self.owner == user
    }

    /// Returns the members, owner included.
    #[must_use]
    pub const fn members(&self) -> &BTreeSet<UserId> {
        &self.members
    }

    /// Returns whether `user` is a member (the owner always is).
    #[must_use]
    pub fn is_member(&self, user: UserId) -> bool {
        self.members.contains(&user)
    }

    /// Returns the status pipeline.
    #[must_use]
    pub const fn statuses(&self) -> &StatusPipeline {
        &self.statuses
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
