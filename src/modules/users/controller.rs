use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use campusmart_core::{AppError, Page, PaginationParams};
use campusmart_models::{
    AuthResponse, ChangePasswordDto, MessageResponse, UpdateProfileDto, User, UserFilterParams,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::UserService;

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_profile(auth_user: AuthUser) -> Json<User> {
    Json(auth_user.0)
}

/// Update the current user's profile
#[utoipa::path(
    put,
    path = "/api/auth/profile",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip_all, fields(user_id = %auth_user.id()))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<User>, AppError> {
    let user = UserService::update_profile(state.users.as_ref(), &auth_user.0, dto).await?;
    Ok(Json(user))
}

/// Change the current user's password
///
/// Every previously issued token is revoked; the response carries a new pair.
#[utoipa::path(
    post,
    path = "/api/auth/profile/change-password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = AuthResponse),
        (status = 400, description = "Wrong current password or validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip_all, fields(user_id = %auth_user.id()))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<AuthResponse>, AppError> {
    let response =
        UserService::change_password(state.users.as_ref(), &state.tokens, &auth_user.0, dto)
            .await?;
    Ok(Json(response))
}

/// List active users (admin only)
#[utoipa::path(
    get,
    path = "/api/auth/users",
    params(PaginationParams, UserFilterParams),
    responses(
        (status = 200, description = "Page of users", body = Page<User>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Administrator privileges required", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn get_users(
    State(state): State<AppState>,
    pagination: Result<Query<PaginationParams>, QueryRejection>,
    filters: Result<Query<UserFilterParams>, QueryRejection>,
) -> Result<Json<Page<User>>, AppError> {
    let Query(pagination) = pagination
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let page = UserService::list_users(state.users.as_ref(), &filters, &pagination).await?;
    Ok(Json(page))
}

/// Soft-delete a user (admin only)
#[utoipa::path(
    delete,
    path = "/api/auth/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Cannot delete own account", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Administrator privileges required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn delete_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    UserService::delete_user(state.users.as_ref(), &auth_user.0, user_id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
