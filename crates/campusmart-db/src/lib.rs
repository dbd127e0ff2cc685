//! # Campusmart DB
//!
//! Persistence for the Campusmart API.
//!
//! - [`store`]: The [`UserStore`] and [`ResourceStore`] traits the services
//!   are written against
//! - [`postgres`]: PostgreSQL implementations built on `sqlx`
//! - `memory` (feature `memory`): in-process implementations for tests
//!
//! The database is the only arbiter of consistency. Email uniqueness is a
//! unique index, each write is a single statement, and concurrent updates to
//! one record are last-writer-wins.

pub mod postgres;
pub mod store;

#[cfg(feature = "memory")]
pub mod memory;

use anyhow::Context;
use campusmart_core::AppError;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::time::Duration;

// Re-export PgPool for convenience
pub use sqlx::PgPool;
pub use store::{ResourceStore, UserStore, Window};

/// Connects a PostgreSQL pool using `DATABASE_URL`.
///
/// `DATABASE_MAX_CONNECTIONS` (default 10) caps the pool size.
///
/// # Errors
///
/// Fails when `DATABASE_URL` is missing or the database is unreachable.
/// Callers are expected to abort startup on error.
///
/// # Example
///
/// ```ignore
/// let pool = init_db_pool().await?;
/// run_migrations(&pool).await?;
/// ```
pub async fn init_db_pool() -> anyhow::Result<PgPool> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await
        .context("Failed to connect to database")
}

/// Applies the SQL migrations embedded from `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")
}

/// Maps a write error, turning unique violations into a 409 with `conflict`.
pub(crate) fn map_write_error(err: sqlx::Error, context: &str, conflict: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::conflict(conflict.to_string())
        }
        _ => AppError::database(anyhow::Error::new(err).context(context.to_string())),
    }
}

/// Escapes `%`, `_` and `\` so user input matches literally inside `ILIKE`.
pub(crate) fn like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() + 2);
    escaped.push('%');
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
