use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use campusmart_core::AppError;
use campusmart_models::User;
use tracing::debug;

use crate::state::AppState;

const INVALID_TOKEN: &str = "Invalid or expired token";

/// Extractor that resolves the bearer token to a live user.
///
/// The user is re-read from the store on every request, so role changes,
/// soft deletes and token version bumps apply to tokens already issued.
/// A user resolved earlier in the same request (by the admin gate) is reused.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn id(&self) -> uuid::Uuid {
        self.0.id
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let token = bearer_token(parts)?;

        let verified = state
            .tokens
            .validate_access(token)
            .map_err(|e| e.into_app_error(INVALID_TOKEN))?;

        let user = state
            .users
            .find_by_id(verified.user_id)
            .await?
            .filter(|user| !user.is_deleted)
            .ok_or_else(|| {
                debug!(user_id = %verified.user_id, "Token for missing or deleted user");
                AppError::unauthorized("User not found".to_string())
            })?;

        if user.token_version != verified.token_version {
            debug!(user_id = %user.id, "Token from a revoked token version");
            return Err(AppError::unauthorized(INVALID_TOKEN.to_string()));
        }

        let auth_user = AuthUser(user);
        parts.extensions.insert(auth_user.clone());
        Ok(auth_user)
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header_value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header_value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_missing_header() {
        let err = bearer_token(&parts_with(None)).unwrap_err();
        assert_eq!(err.client_message(), "Missing authorization header");
    }

    #[test]
    fn test_wrong_scheme() {
        let err = bearer_token(&parts_with(Some("Basic dXNlcjpwYXNz"))).unwrap_err();
        assert_eq!(err.client_message(), "Invalid authorization header format");
    }

    #[test]
    fn test_empty_bearer() {
        assert!(bearer_token(&parts_with(Some("Bearer "))).is_err());
    }

    #[test]
    fn test_extracts_token() {
        let parts = parts_with(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts).unwrap(), "abc.def.ghi");
    }
}
