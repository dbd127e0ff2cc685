use anyhow::Context;
use async_trait::async_trait;
use campusmart_core::AppError;
use campusmart_models::{
    BorrowFilterParams, BorrowRequest, CreateBorrowRequestDto, Resource, UpdateBorrowRequestDto,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{fetch_by_id, fetch_by_owner, not_found, push_set, soft_delete};
use crate::store::{ResourceStore, Window};

#[derive(Clone)]
pub struct PgBorrowRequestStore {
    pool: PgPool,
}

impl PgBorrowRequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &BorrowFilterParams) {
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status);
    }
}

#[async_trait]
impl ResourceStore<BorrowRequest> for PgBorrowRequestStore {
    async fn insert(
        &self,
        owner_id: Uuid,
        draft: CreateBorrowRequestDto,
    ) -> Result<BorrowRequest, AppError> {
        sqlx::query_as::<_, BorrowRequest>(
            r#"
            INSERT INTO borrow_requests (requester_id, item_name, reason, budget_range, needed_for)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(draft.item_name)
        .bind(draft.reason)
        .bind(draft.budget_range)
        .bind(draft.needed_for)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert borrow request")
        .map_err(AppError::database)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BorrowRequest>, AppError> {
        fetch_by_id(&self.pool, "borrow_requests", id).await
    }

    async fn find_active(
        &self,
        filter: &BorrowFilterParams,
        window: Option<Window>,
    ) -> Result<Vec<BorrowRequest>, AppError> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT * FROM borrow_requests WHERE is_deleted = FALSE");
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
            .build_query_as::<BorrowRequest>()
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch borrow requests")
            .map_err(AppError::database)
    }

    async fn count_active(&self, filter: &BorrowFilterParams) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM borrow_requests WHERE is_deleted = FALSE",
        );
        push_filters(&mut builder, filter);

        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .context("Failed to count borrow requests")
            .map_err(AppError::database)
    }

    async fn find_active_by_owner(&self, owner_id: Uuid) -> Result<Vec<BorrowRequest>, AppError> {
        fetch_by_owner(&self.pool, "borrow_requests", "requester_id", owner_id).await
    }

    async fn update(
        &self,
        id: Uuid,
        patch: UpdateBorrowRequestDto,
    ) -> Result<BorrowRequest, AppError> {
        let mut builder =
            QueryBuilder::<Postgres>::new("UPDATE borrow_requests SET updated_at = NOW()");
        push_set(&mut builder, "item_name", patch.item_name);
        push_set(&mut builder, "reason", patch.reason);
        push_set(&mut builder, "budget_range", patch.budget_range);
        push_set(&mut builder, "needed_for", patch.needed_for);
        push_set(&mut builder, "status", patch.status);
        builder.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        builder
            .build_query_as::<BorrowRequest>()
            .fetch_optional(&self.pool)
            .await
            .context("Failed to update borrow request")
            .map_err(AppError::database)?
            .ok_or_else(|| not_found(BorrowRequest::KIND))
    }

    async fn mark_deleted(&self, id: Uuid) -> Result<(), AppError> {
        soft_delete(&self.pool, "borrow_requests", BorrowRequest::KIND, id).await
    }
}
