use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use campusmart_auth::TokenPair;
use campusmart_core::AppError;
use campusmart_models::{
    AuthResponse, LoginRequest, MessageResponse, OAuthCallbackParams, RefreshTokenRequest,
    RegisterRequestDto,
};
use tracing::{instrument, warn};
use utoipa::ToSchema;

use super::identity::IdentityProvider;
use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Register a new student account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered and signed in", body = AuthResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "User already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = AuthService::register_user(state.users.as_ref(), &state.tokens, dto).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::login_user(state.users.as_ref(), &state.tokens, dto).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenPair),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid refresh token", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let pair =
        AuthService::refresh_tokens(state.users.as_ref(), &state.tokens, &dto.refresh_token)
            .await?;
    Ok(Json(pair))
}

/// Revoke every access and refresh token issued to the current user
#[utoipa::path(
    post,
    path = "/api/auth/logout-all",
    responses(
        (status = 200, description = "All sessions revoked", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = %auth_user.id()))]
pub async fn logout_all(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::logout_all(state.users.as_ref(), &auth_user.0).await?;
    Ok(Json(MessageResponse::new("Signed out of all sessions")))
}

/// Start Google sign-in
#[utoipa::path(
    get,
    path = "/api/auth/google",
    responses(
        (status = 302, description = "Redirect to Google"),
        (status = 503, description = "Google sign-in is not configured", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn google_auth(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Response), AppError> {
    let provider = identity_provider(&state)?;
    let oauth_state = state
        .tokens
        .issue_oauth_state()
        .map_err(|e| e.into_app_error("Failed to start Google sign-in"))?;
    let url = provider.authorize_url(&oauth_state)?;

    let cookie = Cookie::build((OAUTH_STATE_COOKIE, oauth_state))
        .path(OAUTH_COOKIE_PATH)
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    Ok((jar.add(cookie), found(&url)))
}

/// Google sign-in callback
///
/// Redirects to the frontend with both tokens in the query string, or to the
/// login page with `error=auth_failed`.
#[utoipa::path(
    get,
    path = "/api/auth/google/callback",
    params(OAuthCallbackParams),
    responses(
        (status = 302, description = "Redirect to the frontend"),
        (status = 503, description = "Google sign-in is not configured", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<OAuthCallbackParams>,
) -> Result<(CookieJar, Response), AppError> {
    let provider = identity_provider(&state)?;
    let frontend_url = &state.server_config.frontend_url;
    let expected_state = jar
        .get(OAUTH_STATE_COOKIE)
        .map(|cookie| cookie.value().to_string());
    // The state is single-use whatever the outcome.
    let jar = jar.remove(Cookie::build(OAUTH_STATE_COOKIE).path(OAUTH_COOKIE_PATH));

    let outcome =
        complete_google_sign_in(&state, provider.as_ref(), params, expected_state.as_deref())
            .await;
    let location = match outcome {
        Ok(pair) => format!(
            "{}/auth/callback?accessToken={}&refreshToken={}",
            frontend_url, pair.access_token, pair.refresh_token
        ),
        Err(err) => {
            warn!(error = %err.error, "Google sign-in failed");
            format!("{}/login?error=auth_failed", frontend_url)
        }
    };
    Ok((jar, found(&location)))
}

async fn complete_google_sign_in(
    state: &AppState,
    provider: &dyn IdentityProvider,
    params: OAuthCallbackParams,
    expected_state: Option<&str>,
) -> Result<TokenPair, AppError> {
    if let Some(error) = params.error {
        return Err(AppError::unauthorized(format!("Provider returned {}", error)));
    }

    // The state must be the one minted for this browser, and still fresh.
    match (params.state.as_deref(), expected_state) {
        (Some(received), Some(expected)) if received == expected => state
            .tokens
            .validate_oauth_state(received)
            .map_err(|e| e.into_app_error("Invalid sign-in state"))?,
        _ => return Err(AppError::unauthorized("Sign-in state mismatch".to_string())),
    }

    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AppError::unauthorized("Missing authorization code".to_string()))?;

    let identity = provider.verify(&code).await?;
    AuthService::oauth_login(state.users.as_ref(), &state.tokens, identity).await
}

fn identity_provider(state: &AppState) -> Result<std::sync::Arc<dyn IdentityProvider>, AppError> {
    state
        .identity_provider
        .clone()
        .ok_or_else(|| AppError::service_unavailable("Google sign-in is not configured".to_string()))
}

const OAUTH_STATE_COOKIE: &str = "campusmart_oauth_state";
const OAUTH_COOKIE_PATH: &str = "/api/auth/google";

/// 302 Found to `location`.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
