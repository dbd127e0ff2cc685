use anyhow::Context;
use async_trait::async_trait;
use campusmart_core::AppError;
use campusmart_models::{
    CreateNightMarketPostDto, NightMarketFilter, NightMarketPost, Resource,
    UpdateNightMarketPostDto,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{fetch_by_id, fetch_by_owner, not_found, push_set, soft_delete};
use crate::store::{ResourceStore, Window};

#[derive(Clone)]
pub struct PgNightMarketStore {
    pool: PgPool,
}

impl PgNightMarketStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &NightMarketFilter) {
    if filter.available_only {
        builder.push(" AND is_available = TRUE");
    }
    if let Some(hostel) = &filter.hostel {
        builder
            .push(" AND LOWER(hostel) = LOWER(")
            .push_bind(hostel.clone())
            .push(")");
    }
}

#[async_trait]
impl ResourceStore<NightMarketPost> for PgNightMarketStore {
    async fn insert(
        &self,
        owner_id: Uuid,
        draft: CreateNightMarketPostDto,
    ) -> Result<NightMarketPost, AppError> {
        sqlx::query_as::<_, NightMarketPost>(
            r#"
            INSERT INTO night_market_posts (seller_id, item, price, quantity, hostel)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(draft.item)
        .bind(draft.price)
        .bind(draft.quantity)
        .bind(draft.hostel)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert night market post")
        .map_err(AppError::database)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<NightMarketPost>, AppError> {
        fetch_by_id(&self.pool, "night_market_posts", id).await
    }

    async fn find_active(
        &self,
        filter: &NightMarketFilter,
        window: Option<Window>,
    ) -> Result<Vec<NightMarketPost>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT * FROM night_market_posts WHERE is_deleted = FALSE",
        );
        push_filters(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC, id DESC");
        if let Some(window) = window {
            builder
                .push(" LIMIT ")
                .push_bind(window.limit)
                .push(" OFFSET ")
                .push_bind(window.offset);
        }

        builder
            .build_query_as::<NightMarketPost>()
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch night market posts")
            .map_err(AppError::database)
    }

    async fn count_active(&self, filter: &NightMarketFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM night_market_posts WHERE is_deleted = FALSE",
        );
        push_filters(&mut builder, filter);

        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .context("Failed to count night market posts")
            .map_err(AppError::database)
    }

    async fn find_active_by_owner(&self, owner_id: Uuid) -> Result<Vec<NightMarketPost>, AppError> {
        fetch_by_owner(&self.pool, "night_market_posts", "seller_id", owner_id).await
    }

    async fn update(
        &self,
        id: Uuid,
        patch: UpdateNightMarketPostDto,
    ) -> Result<NightMarketPost, AppError> {
        let mut builder =
            QueryBuilder::<Postgres>::new("UPDATE night_market_posts SET updated_at = NOW()");
        push_set(&mut builder, "price", patch.price);
        push_set(&mut builder, "quantity", patch.quantity);
        push_set(&mut builder, "is_available", patch.is_available);
        builder.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        builder
            .build_query_as::<NightMarketPost>()
            .fetch_optional(&self.pool)
            .await
            .context("Failed to update night market post")
            .map_err(AppError::database)?
            .ok_or_else(|| not_found(NightMarketPost::KIND))
    }

    async fn mark_deleted(&self, id: Uuid) -> Result<(), AppError> {
        soft_delete(&self.pool, "night_market_posts", NightMarketPost::KIND, id).await
    }
}
