//! Database migration management for the token tables.
//!
//! Migrations are embedded in the binary at compile time and applied as an
//! ordered, linear chain before the service starts serving requests. The
//! chain is never consulted at request time.

use sqlx_core::migrate::{Migration, MigrationType, Migrator};
use std::borrow::Cow;
use tracing::{info, instrument};

use crate::{PgPool, StoreInitError};

/// Macro to define embedded migrations at compile time.
///
/// Usage: Add new migrations here in chronological order.
/// Each migration is a tuple of (version, description, sql_path)
macro_rules! embedded_migrations {
    () => {
        &[
            (
                20240101000001i64,
                "document_baseline",
                include_str!("../../migrations/20240101000001_document_baseline.sql"),
            ),
            (
                20240101000002i64,
                "add_documentsharetoken",
                include_str!("../../migrations/20240101000002_add_documentsharetoken.sql"),
            ),
            (
                20240101000003i64,
                "add_apitoken",
                include_str!("../../migrations/20240101000003_add_apitoken.sql"),
            ),
        ]
    };
}

/// Builds a vector of Migration structs from embedded migration data.
fn build_migrations() -> Vec<Migration> {
    embedded_migrations!()
        .iter()
        .map(|(version, description, sql)| Migration {
            version: *version,
            description: Cow::Borrowed(description),
            migration_type: MigrationType::Simple,
            sql: Cow::Borrowed(sql),
            checksum: Cow::Borrowed(&[]),
            no_tx: false,
        })
        .collect()
}

/// Runs all pending migrations for the token tables.
///
/// Applied migrations are tracked in `_sqlx_migrations`; each step runs in
/// a transaction and declares its position in the chain through its
/// version number.
///
/// # Errors
///
/// Returns an error if a migration fails to execute.
#[instrument(skip(pool))]
pub async fn run(pool: &PgPool) -> Result<(), StoreInitError> {
    let migrations = build_migrations();
    info!("Applying {} token migration(s)", migrations.len());

    let migrator = Migrator {
        migrations: Cow::Owned(migrations),
        ignore_missing: false,
        locking: true,
        no_tx: false,
    };

    migrator.run(pool).await?;

    info!("Token migrations completed");
    Ok(())
}
