//! Embedded schema migrations applied at startup.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations compiled from `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The migration connection could not be opened.
    #[error("failed to connect for migrations: {message}")]
    Connect { message: String },
    /// A migration failed to apply.
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
    /// The blocking migration task panicked or was cancelled.
    #[error("migration task failed: {message}")]
    Task { message: String },
}

fn apply_blocking(database_url: &str) -> Result<usize, MigrationError> {
    let mut connection =
        PgConnection::establish(database_url).map_err(|err| MigrationError::Connect {
            message: err.to_string(),
        })?;
    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    Ok(applied.len())
}

/// Apply every pending migration against `database_url`.
///
/// Diesel's migration harness is synchronous, so the work runs on the blocking
/// thread pool. Returns the number of migrations applied.
pub async fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || apply_blocking(&url))
        .await
        .map_err(|err| MigrationError::Task {
            message: err.to_string(),
        })??;
    info!(applied, "database migrations complete");
    Ok(applied)
}
