//! Authentication payloads.

use crate::users::User;
use crate::value_types::Email;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Self-registration. Accounts created here are always students.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestDto {
    pub email: Email,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 7, max = 20, message = "phoneNumber must be between 7 and 20 characters"))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, max = 100, message = "campus must be between 1 and 100 characters"))]
    pub campus: Option<String>,
    #[validate(length(min = 1, max = 100, message = "hostel must be between 1 and 100 characters"))]
    pub hostel: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    pub email: Email,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "refreshToken is required"))]
    pub refresh_token: String,
}

/// Returned by registration and login.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Query string delivered by the identity provider redirect.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// An identity the external provider has already verified.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    pub email: Email,
    pub name: Option<String>,
    /// Stable subject identifier issued by the provider
    pub provider_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_accepts_camel_case() {
        let dto: RegisterRequestDto = serde_json::from_str(
            r#"{"email":"U1@x.com","password":"secret123","phoneNumber":"08031234567"}"#,
        )
        .unwrap();
        assert_eq!(dto.email.as_str(), "u1@x.com");
        assert_eq!(dto.phone_number.as_deref(), Some("08031234567"));
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_register_ignores_role() {
        let dto: RegisterRequestDto = serde_json::from_str(
            r#"{"email":"u1@x.com","password":"secret123","role":"ADMIN"}"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_register_short_password() {
        let dto: RegisterRequestDto =
            serde_json::from_str(r#"{"email":"u1@x.com","password":"123"}"#).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_refresh_request_field_name() {
        let dto: RefreshTokenRequest =
            serde_json::from_str(r#"{"refreshToken":"abc"}"#).unwrap();
        assert_eq!(dto.refresh_token, "abc");
    }
}
