use anyhow::Context;
use async_trait::async_trait;
use campusmart_auth::UserLookup;
use campusmart_core::AppError;
use campusmart_models::{Email, NewUser, UpdateProfileDto, User, UserFilterParams};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use super::push_set;
use crate::map_write_error;
use crate::store::{UserStore, Window};

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_updated(
        &self,
        query: QueryAs<'_, Postgres, User, PgArguments>,
        id: Uuid,
    ) -> Result<User, AppError> {
        query
            .fetch_optional(&self.pool)
            .await
            .context("Failed to update user")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User with id {} not found", id)))
    }
}

#[async_trait]
impl UserLookup for PgUserStore {
    async fn active_token_version(&self, user_id: Uuid) -> Result<Option<i32>, AppError> {
        sqlx::query_scalar::<_, i32>(
            "SELECT token_version FROM users WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch token version")
        .map_err(AppError::database)
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, google_id, name, phone_number, campus, hostel, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.google_id)
        .bind(&user.name)
        .bind(&user.phone_number)
        .bind(&user.campus)
        .bind(&user.hostel)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to insert user", "User already exists"))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by ID")
            .map_err(AppError::database)
    }

    async fn find_active_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1) AND is_deleted = FALSE")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch users by ID")
            .map_err(AppError::database)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by email")
            .map_err(AppError::database)
    }

    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE google_id = $1")
            .bind(google_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by Google ID")
            .map_err(AppError::database)
    }

    async fn link_google_id(&self, id: Uuid, google_id: &str) -> Result<User, AppError> {
        let query = sqlx::query_as::<_, User>(
            "UPDATE users SET google_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(google_id.to_string());
        self.fetch_updated(query, id).await
    }

    #[instrument(skip(self, changes))]
    async fn update_profile(&self, id: Uuid, changes: UpdateProfileDto) -> Result<User, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = NOW()");
        push_set(&mut builder, "name", changes.name);
        push_set(&mut builder, "phone_number", changes.phone_number);
        push_set(&mut builder, "campus", changes.campus);
        push_set(&mut builder, "hostel", changes.hostel);
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND is_deleted = FALSE RETURNING *");

        self.fetch_updated(builder.build_query_as::<User>(), id).await
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> Result<User, AppError> {
        let query = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET password_hash = $2, token_version = token_version + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(password_hash);
        self.fetch_updated(query, id).await
    }

    async fn bump_token_version(&self, id: Uuid) -> Result<User, AppError> {
        let query = sqlx::query_as::<_, User>(
            "UPDATE users SET token_version = token_version + 1, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id);
        self.fetch_updated(query, id).await
    }

    #[instrument(skip(self))]
    async fn mark_deleted(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_deleted = TRUE, token_version = token_version + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to delete user")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("User not found")));
        }
        Ok(())
    }

    async fn find_active_page(
        &self,
        filter: &UserFilterParams,
        window: Window,
    ) -> Result<(Vec<User>, i64), AppError> {
        let mut count =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users WHERE is_deleted = FALSE");
        let mut select =
            QueryBuilder::<Postgres>::new("SELECT * FROM users WHERE is_deleted = FALSE");
        if let Some(role) = filter.role {
            count.push(" AND role = ").push_bind(role);
            select.push(" AND role = ").push_bind(role);
        }
        select
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(window.limit)
            .push(" OFFSET ")
            .push_bind(window.offset);

        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .context("Failed to count users")
            .map_err(AppError::database)?;

        let users = select
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch users")
            .map_err(AppError::database)?;

        Ok((users, total))
    }
}
