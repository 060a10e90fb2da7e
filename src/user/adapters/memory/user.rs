//! In-memory repository for users and badges.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::user::{
    domain::{Badge, BadgeGrant, User, UserId},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> UserRepositoryError {
    UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let mut users = self.state.write().map_err(lock_error)?;
        if users.contains_key(&user.id()) {
            return Err(UserRepositoryError::DuplicateUser(user.id()));
        }
        if users.values().any(|existing| existing.email() == user.email()) {
            return Err(UserRepositoryError::DuplicateEmail(user.email().to_owned()));
        }
        users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let users = self.state.read().map_err(lock_error)?;
        Ok(users.get(&id).cloned())
    }

    async fn grant_badge(&self, user: UserId, badge: &Badge) -> UserRepositoryResult<BadgeGrant> {
        let mut users = self.state.write().map_err(lock_error)?;
        let stored = users
            .get_mut(&user)
            .ok_or(UserRepositoryError::NotFound(user))?;
        Ok(stored.grant_badge(badge.clone()))
    }
}
