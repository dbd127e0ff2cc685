use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use campusmart_core::{AppError, Page, PaginationParams};
use campusmart_models::{
    CreateListingDto, Listing, ListingFilterParams, ListingView, MessageResponse, ShareMessage,
    UpdateListingDto,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::ListingService;

/// Create a listing
///
/// The response already carries the listing's QR code.
#[utoipa::path(
    post,
    path = "/api/listings",
    request_body = CreateListingDto,
    responses(
        (status = 201, description = "Listing created", body = Listing),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Listings"
)]
#[instrument(skip_all, fields(user_id = %auth_user.id()))]
pub async fn create_listing(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateListingDto>,
) -> Result<(StatusCode, Json<Listing>), AppError> {
    let listing =
        ListingService::create_listing(&state.listings, &state.server_config, &auth_user.0, dto)
            .await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// Browse listings
///
/// Each listing carries its seller's contact details.
#[utoipa::path(
    get,
    path = "/api/listings",
    params(ListingFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Page of listings", body = Page<ListingView>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse)
    ),
    tag = "Listings"
)]
#[instrument(skip_all)]
pub async fn get_listings(
    State(state): State<AppState>,
    filters: Result<Query<ListingFilterParams>, QueryRejection>,
    pagination: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<Page<ListingView>>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    let Query(pagination) = pagination
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let page = state
        .listings
        .list_with_owners(state.users.as_ref(), &filters, &pagination)
        .await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/listings/{id}",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing details", body = ListingView),
        (status = 404, description = "Listing not found", body = ErrorResponse)
    ),
    tag = "Listings"
)]
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ListingView>, AppError> {
    let listing = state.listings.get_with_owner(state.users.as_ref(), id).await?;
    Ok(Json(listing))
}

/// Update a listing you own
///
/// Only supplied fields change. A sold listing cannot be made available again.
#[utoipa::path(
    put,
    path = "/api/listings/{id}",
    params(("id" = Uuid, Path, description = "Listing ID")),
    request_body = UpdateListingDto,
    responses(
        (status = 200, description = "Listing updated", body = Listing),
        (status = 400, description = "Validation error, or listing not found or unauthorized", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Listings"
)]
#[instrument(skip_all, fields(user_id = %auth_user.id(), listing_id = %id))]
pub async fn update_listing(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateListingDto>,
) -> Result<Json<Listing>, AppError> {
    let listing = state.listings.update(id, &auth_user.0, dto).await?;
    Ok(Json(listing))
}

/// Delete a listing you own
#[utoipa::path(
    delete,
    path = "/api/listings/{id}",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing deleted", body = MessageResponse),
        (status = 400, description = "Listing not found or unauthorized", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Listings"
)]
#[instrument(skip_all, fields(user_id = %auth_user.id(), listing_id = %id))]
pub async fn delete_listing(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.listings.delete(id, &auth_user.0).await?;
    Ok(Json(MessageResponse::new("Listing deleted successfully")))
}

/// The current user's listings
#[utoipa::path(
    get,
    path = "/api/user/listings",
    responses(
        (status = 200, description = "Listings created by the caller", body = Vec<Listing>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Listings"
)]
pub async fn get_my_listings(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Listing>>, AppError> {
    let listings = state.listings.list_by_owner(auth_user.id()).await?;
    Ok(Json(listings))
}

/// Generate a shareable message for a listing
#[utoipa::path(
    get,
    path = "/api/share/generate-message/{id}",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Share message and link", body = ShareMessage),
        (status = 404, description = "Listing not found", body = ErrorResponse)
    ),
    tag = "Listings"
)]
pub async fn generate_share_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShareMessage>, AppError> {
    let share = ListingService::share_message(
        &state.listings,
        state.users.as_ref(),
        &state.server_config,
        id,
    )
    .await?;
    Ok(Json(share))
}
