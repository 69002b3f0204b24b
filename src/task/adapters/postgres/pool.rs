//! Connection pool and blocking-call bridge shared by the `PostgreSQL`
//! adapters.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

/// `PostgreSQL` connection pool type used by marketplace adapters.
pub type MarketPgPool = Pool<ConnectionManager<PgConnection>>;

/// Error raised when the pool or the blocking task fails before the
/// closure runs.
#[derive(Debug, thiserror::Error)]
pub enum BlockingError {
    /// No connection could be checked out.
    #[error(transparent)]
    Pool(#[from] PoolError),
    /// The blocking task panicked or was cancelled.
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
}

/// Runs `f` with a pooled connection on the blocking thread pool.
///
/// # Errors
///
/// Returns the closure's error, or `E::from` a [`BlockingError`] when a
/// connection cannot be obtained or the blocking task fails.
pub async fn run_blocking<F, T, E>(pool: &MarketPgPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<BlockingError> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(|err| E::from(BlockingError::Pool(err)))?;
        f(&mut connection)
    })
    .await
    .map_err(|err| E::from(BlockingError::Join(err)))?
}
