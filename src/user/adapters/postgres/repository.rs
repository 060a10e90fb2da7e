//! `PostgreSQL` repository implementation for users and badges.

use super::{
    models::{NewUserBadgeRow, NewUserRow, UserRow},
    schema::{user_badges, users},
};
use crate::persistence::{PersistenceFailure, PgPool, run_blocking};
use crate::user::{
    domain::{Badge, BadgeGrant, PersistedUserData, User, UserId},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::BTreeSet;

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PersistenceFailure for UserRepositoryError {
    fn from_persistence<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::persistence(err)
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let user_id = user.id();
        let email = user.email().to_owned();
        let new_row = NewUserRow {
            id: user_id.into_inner(),
            name: user.name().to_owned(),
            email: email.clone(),
            created_at: user.created_at(),
        };
        let badge_rows: Vec<NewUserBadgeRow> = user
            .badges()
            .iter()
            .map(|badge| NewUserBadgeRow {
                user_id: user_id.into_inner(),
                label: badge.as_str().to_owned(),
                granted_at: user.created_at(),
            })
            .collect();

        run_blocking(&self.pool, move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    diesel::insert_into(users::table)
                        .values(&new_row)
                        .execute(tx)?;
                    if !badge_rows.is_empty() {
                        diesel::insert_into(user_badges::table)
                            .values(&badge_rows)
                            .execute(tx)?;
                    }
                    Ok(())
                })
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if info.constraint_name() == Some("users_email_key") =>
                    {
                        UserRepositoryError::DuplicateEmail(email.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        UserRepositoryError::DuplicateUser(user_id)
                    }
                    _ => UserRepositoryError::persistence(err),
                })
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        run_blocking(&self.pool, move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            let Some(user_row) = row else {
                return Ok(None);
            };
            let labels = load_badge_labels(connection, id)?;
            row_to_user(user_row, labels).map(Some)
        })
        .await
    }

    async fn grant_badge(&self, user: UserId, badge: &Badge) -> UserRepositoryResult<BadgeGrant> {
        let new_row = NewUserBadgeRow {
            user_id: user.into_inner(),
            label: badge.as_str().to_owned(),
            granted_at: Utc::now(),
        };

        run_blocking(&self.pool, move |connection| {
            let exists = diesel::select(diesel::dsl::exists(
                users::table.filter(users::id.eq(user.into_inner())),
            ))
            .get_result::<bool>(connection)
            .map_err(UserRepositoryError::persistence)?;
            if !exists {
                return Err(UserRepositoryError::NotFound(user));
            }

            let inserted = diesel::insert_into(user_badges::table)
                .values(&new_row)
                .on_conflict_do_nothing()
                .execute(connection)
                .map_err(UserRepositoryError::persistence)?;
            Ok(grant_from_inserted_rows(inserted))
        })
        .await
    }
}

fn load_badge_labels(
    connection: &mut PgConnection,
    user: UserId,
) -> UserRepositoryResult<Vec<String>> {
    user_badges::table
        .filter(user_badges::user_id.eq(user.into_inner()))
        .select(user_badges::label)
        .load::<String>(connection)
        .map_err(UserRepositoryError::persistence)
}

const fn grant_from_inserted_rows(inserted: usize) -> BadgeGrant {
    if inserted == 0 {
        BadgeGrant::AlreadyHeld
    } else {
        BadgeGrant::Granted
    }
}

fn row_to_user(row: UserRow, labels: Vec<String>) -> UserRepositoryResult<User> {
    let badges = labels
        .into_iter()
        .map(Badge::new)
        .collect::<Result<BTreeSet<_>, _>>()
        .map_err(UserRepositoryError::persistence)?;

    Ok(User::from_persisted(PersistedUserData {
        id: UserId::from_uuid(row.id),
        name: row.name,
        email: row.email,
        badges,
        created_at: row.created_at,
    }))
}
