//! PostgreSQL storage backend for coscribe-tokens.
//!
//! Implements [`coscribe_tokens::TokenStore`] over two typed tables,
//! `apitoken` and `documentsharetoken`, created by the embedded migration
//! chain in [`migrations`].
//!
//! Secrets are resolved through the UNIQUE index on each table's `token`
//! column, so lookup is an exact-match index probe whose timing does not
//! depend on how much of a presented secret matches a stored one.
//!
//! # Example
//!
//! ```ignore
//! use coscribe_tokens_postgres::{PostgresTokenStore, migrations};
//!
//! let store = PostgresTokenStore::connect("postgres://localhost/coscribe", 5).await?;
//! migrations::run(store.pool()).await?;
//! ```

pub mod migrations;
pub mod store;

use coscribe_tokens::TokenError;
use sqlx_core::pool::Pool;
use sqlx_postgres::{PgPoolOptions, Postgres};

pub use store::PostgresTokenStore;

/// PostgreSQL connection pool type alias.
pub type PgPool = Pool<Postgres>;

/// Errors that can occur while bringing the backend up.
///
/// Runtime storage faults surface as `TokenError::StoreUnavailable`
/// through the `TokenStore` trait; this type only covers connection and
/// migration failures during startup.
#[derive(Debug, thiserror::Error)]
pub enum StoreInitError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx_core::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx_core::migrate::MigrateError),
}

impl PostgresTokenStore {
    /// Connects to PostgreSQL and wraps the pool in a token store.
    ///
    /// Migrations are not run here; call [`migrations::run`] during
    /// startup, before serving requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreInitError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }
}

/// Returns `true` if a sqlx error is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx_core::Error) -> bool {
    if let sqlx_core::Error::Database(db_err) = err {
        db_err.is_unique_violation()
    } else {
        false
    }
}

/// Returns `true` if a sqlx error is a foreign-key violation.
pub(crate) fn is_foreign_key_violation(err: &sqlx_core::Error) -> bool {
    if let sqlx_core::Error::Database(db_err) = err {
        db_err.is_foreign_key_violation()
    } else {
        false
    }
}

/// Maps an unclassified sqlx error to a fail-closed infrastructure fault.
pub(crate) fn store_fault(err: sqlx_core::Error) -> TokenError {
    TokenError::store_unavailable(err.to_string())
}
