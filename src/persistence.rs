//! Shared `PostgreSQL` plumbing for the Diesel-backed adapters.
//!
//! Diesel connections are synchronous, so every repository offloads its
//! database work to the blocking thread pool through [`run_blocking`].

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool shared by all taskboard adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Repository errors that can wrap an infrastructure failure.
pub trait PersistenceFailure: Sized {
    /// Wraps a pool, join, or driver error.
    fn from_persistence<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static;
}

/// Runs a blocking Diesel operation on a pooled connection.
///
/// Pool checkout failures and join errors are mapped into the caller's
/// repository error type.
pub(crate) async fn run_blocking<F, T, E>(pool: &PgPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: PersistenceFailure + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(E::from_persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(E::from_persistence)?
}
