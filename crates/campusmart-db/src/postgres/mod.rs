//! PostgreSQL stores.
//!
//! Queries are built at runtime with [`sqlx::QueryBuilder`] so optional
//! filters and partial updates bind only the values that are present.

mod borrow;
mod listings;
mod night_market;
mod users;

pub use borrow::PgBorrowRequestStore;
pub use listings::PgListingStore;
pub use night_market::PgNightMarketStore;
pub use users::PgUserStore;

use anyhow::Context;
use campusmart_core::AppError;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Appends `, column = $n` when `value` is present.
pub(crate) fn push_set<'a, T>(
    builder: &mut QueryBuilder<'a, Postgres>,
    column: &str,
    value: Option<T>,
) where
    T: 'a + sqlx::Encode<'a, Postgres> + sqlx::Type<Postgres> + Send,
{
    if let Some(value) = value {
        builder.push(", ").push(column).push(" = ").push_bind(value);
    }
}

/// Raw lookup by primary key, tombstoned rows included.
pub(crate) async fn fetch_by_id<R>(
    pool: &PgPool,
    table: &'static str,
    id: Uuid,
) -> Result<Option<R>, AppError>
where
    R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    sqlx::query_as::<_, R>(&format!("SELECT * FROM {} WHERE id = $1", table))
        .bind(id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to fetch from {}", table))
        .map_err(AppError::database)
}

pub(crate) async fn fetch_by_owner<R>(
    pool: &PgPool,
    table: &'static str,
    owner_column: &'static str,
    owner_id: Uuid,
) -> Result<Vec<R>, AppError>
where
    R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    sqlx::query_as::<_, R>(&format!(
        "SELECT * FROM {} WHERE {} = $1 AND is_deleted = FALSE ORDER BY created_at DESC",
        table, owner_column
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await
    .with_context(|| format!("Failed to fetch owned rows from {}", table))
    .map_err(AppError::database)
}

pub(crate) async fn soft_delete(
    pool: &PgPool,
    table: &'static str,
    kind: &str,
    id: Uuid,
) -> Result<(), AppError> {
    let result = sqlx::query(&format!(
        "UPDATE {} SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1",
        table
    ))
    .bind(id)
    .execute(pool)
    .await
    .with_context(|| format!("Failed to soft delete from {}", table))
    .map_err(AppError::database)?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(anyhow::anyhow!("{} not found", kind)));
    }
    Ok(())
}

pub(crate) fn not_found(kind: &str) -> AppError {
    AppError::not_found(anyhow::anyhow!("{} not found", kind))
}
