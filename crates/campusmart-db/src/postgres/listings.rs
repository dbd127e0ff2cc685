use anyhow::Context;
use async_trait::async_trait;
use campusmart_core::AppError;
use campusmart_models::{
    CreateListingDto, Listing, ListingFilterParams, ListingSort, Resource, UpdateListingDto,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use super::{fetch_by_id, fetch_by_owner, not_found, push_set, soft_delete};
use crate::like_pattern;
use crate::store::{ResourceStore, Window};

// A deleted seller joins as NULL, so seller filters never match them.
const FROM_ACTIVE: &str = " FROM listings l \
    LEFT JOIN users u ON u.id = l.seller_id AND u.is_deleted = FALSE \
    WHERE l.is_deleted = FALSE";

#[derive(Clone)]
pub struct PgListingStore {
    pool: PgPool,
}

impl PgListingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ListingFilterParams) {
    if let Some(query) = &filter.query {
        let pattern = like_pattern(query);
        builder
            .push(" AND (l.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR l.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(category) = &filter.category {
        builder
            .push(" AND LOWER(l.category) = LOWER(")
            .push_bind(category.clone())
            .push(")");
    }
    if let Some(min_price) = filter.min_price {
        builder.push(" AND l.price >= ").push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        builder.push(" AND l.price <= ").push_bind(max_price);
    }
    if let Some(hostel) = &filter.hostel {
        builder
            .push(" AND LOWER(u.hostel) = LOWER(")
            .push_bind(hostel.clone())
            .push(")");
    }
    if let Some(status) = filter.status {
        builder.push(" AND l.status = ").push_bind(status);
    }
}

fn order_by(sort: ListingSort) -> &'static str {
    match sort {
        ListingSort::Newest => " ORDER BY l.created_at DESC, l.id DESC",
        ListingSort::PriceAsc => " ORDER BY l.price ASC, l.created_at DESC",
        ListingSort::PriceDesc => " ORDER BY l.price DESC, l.created_at DESC",
    }
}

#[async_trait]
impl ResourceStore<Listing> for PgListingStore {
    #[instrument(skip(self, draft))]
    async fn insert(&self, owner_id: Uuid, draft: CreateListingDto) -> Result<Listing, AppError> {
        sqlx::query_as::<_, Listing>(
            r#"
            INSERT INTO listings
                (seller_id, title, description, category, price, "condition", location,
                 whatsapp, negotiable, image_urls)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(draft.title)
        .bind(draft.description)
        .bind(draft.category)
        .bind(draft.price)
        .bind(draft.condition)
        .bind(draft.location)
        .bind(draft.whatsapp)
        .bind(draft.negotiable)
        .bind(draft.image_urls)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert listing")
        .map_err(AppError::database)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, AppError> {
        fetch_by_id(&self.pool, "listings", id).await
    }

    async fn find_active(
        &self,
        filter: &ListingFilterParams,
        window: Option<Window>,
    ) -> Result<Vec<Listing>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT l.*");
        builder.push(FROM_ACTIVE);
        push_filters(&mut builder, filter);
        builder.push(order_by(filter.sort()));
        if let Some(window) = window {
            builder
                .push(" LIMIT ")
                .push_bind(window.limit)
                .push(" OFFSET ")
                .push_bind(window.offset);
        }

        builder
            .build_query_as::<Listing>()
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch listings")
            .map_err(AppError::database)
    }

    async fn count_active(&self, filter: &ListingFilterParams) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        builder.push(FROM_ACTIVE);
        push_filters(&mut builder, filter);

        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .context("Failed to count listings")
            .map_err(AppError::database)
    }

    async fn find_active_by_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>, AppError> {
        fetch_by_owner(&self.pool, "listings", "seller_id", owner_id).await
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: Uuid, patch: UpdateListingDto) -> Result<Listing, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE listings SET updated_at = NOW()");
        push_set(&mut builder, "title", patch.title);
        push_set(&mut builder, "description", patch.description);
        push_set(&mut builder, "category", patch.category);
        push_set(&mut builder, "price", patch.price);
        push_set(&mut builder, "\"condition\"", patch.condition);
        push_set(&mut builder, "location", patch.location);
        push_set(&mut builder, "whatsapp", patch.whatsapp);
        push_set(&mut builder, "negotiable", patch.negotiable);
        push_set(&mut builder, "image_urls", patch.image_urls);
        push_set(&mut builder, "status", patch.status);
        push_set(&mut builder, "qr_url", patch.qr_url);
        builder.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        builder
            .build_query_as::<Listing>()
            .fetch_optional(&self.pool)
            .await
            .context("Failed to update listing")
            .map_err(AppError::database)?
            .ok_or_else(|| not_found(Listing::KIND))
    }

    async fn mark_deleted(&self, id: Uuid) -> Result<(), AppError> {
        soft_delete(&self.pool, "listings", Listing::KIND, id).await
    }
}
