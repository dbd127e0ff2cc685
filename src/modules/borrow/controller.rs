use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use campusmart_core::{AppError, Page, PaginationParams};
use campusmart_models::{
    BorrowFilterParams, BorrowRequest, BorrowRequestView, CreateBorrowRequestDto, MessageResponse,
    RespondToBorrowRequestDto, UpdateBorrowRequestDto,
};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::BorrowService;

#[derive(Serialize, ToSchema)]
pub struct RespondResponse {
    pub message: String,
    pub request: BorrowRequest,
}

#[utoipa::path(
    post,
    path = "/api/borrow",
    request_body = CreateBorrowRequestDto,
    responses(
        (status = 201, description = "Borrow request created", body = BorrowRequest),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Borrow Requests"
)]
#[instrument(skip_all, fields(user_id = %auth_user.id()))]
pub async fn create_borrow_request(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateBorrowRequestDto>,
) -> Result<(StatusCode, Json<BorrowRequest>), AppError> {
    let request = state.borrow_requests.create(&auth_user.0, dto).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

#[utoipa::path(
    get,
    path = "/api/borrow",
    params(BorrowFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Page of borrow requests", body = Page<BorrowRequestView>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Borrow Requests"
)]
#[instrument(skip_all)]
pub async fn get_borrow_requests(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    filters: Result<Query<BorrowFilterParams>, QueryRejection>,
    pagination: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<Page<BorrowRequestView>>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    let Query(pagination) = pagination
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let page = state
        .borrow_requests
        .list_with_owners(state.users.as_ref(), &filters, &pagination)
        .await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/borrow/{id}",
    params(("id" = Uuid, Path, description = "Borrow request ID")),
    responses(
        (status = 200, description = "Borrow request", body = BorrowRequestView),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Borrow request not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Borrow Requests"
)]
pub async fn get_borrow_request(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BorrowRequestView>, AppError> {
    let request = state
        .borrow_requests
        .get_with_owner(state.users.as_ref(), id)
        .await?;
    Ok(Json(request))
}

#[utoipa::path(
    put,
    path = "/api/borrow/{id}",
    params(("id" = Uuid, Path, description = "Borrow request ID")),
    request_body = UpdateBorrowRequestDto,
    responses(
        (status = 200, description = "Borrow request updated", body = BorrowRequest),
        (status = 400, description = "Validation error, or request not found or unauthorized", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Borrow Requests"
)]
#[instrument(skip_all, fields(user_id = %auth_user.id(), request_id = %id))]
pub async fn update_borrow_request(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateBorrowRequestDto>,
) -> Result<Json<BorrowRequest>, AppError> {
    let request = state.borrow_requests.update(id, &auth_user.0, dto).await?;
    Ok(Json(request))
}

#[utoipa::path(
    delete,
    path = "/api/borrow/{id}",
    params(("id" = Uuid, Path, description = "Borrow request ID")),
    responses(
        (status = 200, description = "Borrow request deleted", body = MessageResponse),
        (status = 400, description = "Borrow request not found or unauthorized", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Borrow Requests"
)]
#[instrument(skip_all, fields(user_id = %auth_user.id(), request_id = %id))]
pub async fn delete_borrow_request(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.borrow_requests.delete(id, &auth_user.0).await?;
    Ok(Json(MessageResponse::new("Borrow request deleted successfully")))
}

/// Accept or decline an offer on your own borrow request
#[utoipa::path(
    post,
    path = "/api/borrow/{id}/respond",
    params(("id" = Uuid, Path, description = "Borrow request ID")),
    request_body = RespondToBorrowRequestDto,
    responses(
        (status = 200, description = "Response recorded", body = RespondResponse),
        (status = 400, description = "Request closed, or not found or unauthorized", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Borrow Requests"
)]
#[instrument(skip_all, fields(user_id = %auth_user.id(), request_id = %id))]
pub async fn respond_to_borrow_request(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<RespondToBorrowRequestDto>,
) -> Result<Json<RespondResponse>, AppError> {
    let request =
        BorrowService::respond(&state.borrow_requests, id, &auth_user.0, dto.response).await?;
    Ok(Json(RespondResponse {
        message: "Response recorded".to_string(),
        request,
    }))
}

/// The current user's borrow requests
#[utoipa::path(
    get,
    path = "/api/user/borrow-requests",
    responses(
        (status = 200, description = "Borrow requests created by the caller", body = Vec<BorrowRequest>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Borrow Requests"
)]
pub async fn get_my_borrow_requests(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<BorrowRequest>>, AppError> {
    let requests = state.borrow_requests.list_by_owner(auth_user.id()).await?;
    Ok(Json(requests))
}
