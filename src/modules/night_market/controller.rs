use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use campusmart_core::AppError;
use campusmart_models::{
    CreateNightMarketPostDto, MessageResponse, NightMarketFilterParams, NightMarketPost,
    NightMarketPostView, UpdateNightMarketPostDto,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::{NightMarketService, PostsByHostel};

#[utoipa::path(
    post,
    path = "/api/night-market",
    request_body = CreateNightMarketPostDto,
    responses(
        (status = 201, description = "Post created", body = NightMarketPost),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Night Market"
)]
#[instrument(skip_all, fields(user_id = %auth_user.id()))]
pub async fn create_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateNightMarketPostDto>,
) -> Result<(StatusCode, Json<NightMarketPost>), AppError> {
    let post = state.night_market.create(&auth_user.0, dto).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Available posts grouped by hostel
#[utoipa::path(
    get,
    path = "/api/night-market",
    params(NightMarketFilterParams),
    responses(
        (status = 200, description = "Posts keyed by hostel", body = std::collections::BTreeMap<String, Vec<NightMarketPostView>>)
    ),
    tag = "Night Market"
)]
#[instrument(skip_all)]
pub async fn get_posts(
    State(state): State<AppState>,
    params: Result<Query<NightMarketFilterParams>, QueryRejection>,
) -> Result<Json<PostsByHostel>, AppError> {
    let Query(params) = params
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let grouped =
        NightMarketService::grouped_by_hostel(&state.night_market, state.users.as_ref(), params)
            .await?;
    Ok(Json(grouped))
}

#[utoipa::path(
    get,
    path = "/api/night-market/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post", body = NightMarketPostView),
        (status = 404, description = "Night market post not found", body = ErrorResponse)
    ),
    tag = "Night Market"
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NightMarketPostView>, AppError> {
    let post = state.night_market.get_with_owner(state.users.as_ref(), id).await?;
    Ok(Json(post))
}

#[utoipa::path(
    put,
    path = "/api/night-market/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = UpdateNightMarketPostDto,
    responses(
        (status = 200, description = "Post updated", body = NightMarketPost),
        (status = 400, description = "Validation error, or post not found or unauthorized", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Night Market"
)]
#[instrument(skip_all, fields(user_id = %auth_user.id(), post_id = %id))]
pub async fn update_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateNightMarketPostDto>,
) -> Result<Json<NightMarketPost>, AppError> {
    let post = state.night_market.update(id, &auth_user.0, dto).await?;
    Ok(Json(post))
}

#[utoipa::path(
    delete,
    path = "/api/night-market/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post deleted", body = MessageResponse),
        (status = 400, description = "Night market post not found or unauthorized", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Night Market"
)]
#[instrument(skip_all, fields(user_id = %auth_user.id(), post_id = %id))]
pub async fn delete_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.night_market.delete(id, &auth_user.0).await?;
    Ok(Json(MessageResponse::new("Night market post deleted successfully")))
}

/// The current user's night market posts
#[utoipa::path(
    get,
    path = "/api/user/night-market",
    responses(
        (status = 200, description = "Posts created by the caller", body = Vec<NightMarketPost>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Night Market"
)]
pub async fn get_my_posts(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<NightMarketPost>>, AppError> {
    let posts = state.night_market.list_by_owner(auth_user.id()).await?;
    Ok(Json(posts))
}
