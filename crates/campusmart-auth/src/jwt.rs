//! Token issuance, validation and rotation.
//!
//! [`TokenService`] holds the immutable [`JwtConfig`] built at startup. All of
//! its operations except [`TokenService::rotate`] are synchronous and touch
//! nothing but the signing secrets.

use campusmart_config::JwtConfig;
use campusmart_core::AppError;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::UserLookup;
use crate::claims::{Claims, OAuthStateClaims, RefreshTokenClaims};

/// Seconds a sign-in `state` stays valid.
pub const OAUTH_STATE_TTL_SECONDS: i64 = 600;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, malformed payload, wrong token kind or unknown subject.
    #[error("Invalid token")]
    Invalid,
    /// Well-formed and correctly signed, but past its expiry.
    #[error("Token has expired")]
    Expired,
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    /// Maps to the HTTP-facing error. Expiry and invalidity both
    /// surface as 401 with the given message.
    pub fn into_app_error(self, message: &str) -> AppError {
        match self {
            TokenError::Invalid | TokenError::Expired => AppError::unauthorized(message.to_string()),
            TokenError::Signing(reason) => {
                AppError::internal_error(format!("Failed to sign token: {}", reason))
            }
        }
    }
}

/// An access/refresh token pair as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// The identity proven by a valid token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id: Uuid,
    pub token_version: i32,
}

#[derive(Clone)]
pub struct TokenService {
    config: Arc<JwtConfig>,
}

impl TokenService {
    pub fn new(config: JwtConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Mints an access token and a refresh token for `user_id`.
    ///
    /// The two tokens use different secrets and different lifetimes. Nothing
    /// is persisted.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if encoding fails.
    pub fn issue_token_pair(
        &self,
        user_id: Uuid,
        token_version: i32,
    ) -> Result<TokenPair, TokenError> {
        self.issue_token_pair_at(user_id, token_version, Utc::now().timestamp())
    }

    /// Same as [`issue_token_pair`](Self::issue_token_pair) with an explicit
    /// issue time (Unix seconds).
    pub fn issue_token_pair_at(
        &self,
        user_id: Uuid,
        token_version: i32,
        issued_at: i64,
    ) -> Result<TokenPair, TokenError> {
        let iat = issued_at.max(0) as usize;

        let access = Claims {
            sub: user_id.to_string(),
            ver: token_version,
            jti: Uuid::new_v4().to_string(),
            iat,
            exp: iat + self.config.access_token_expiry as usize,
        };
        let refresh = RefreshTokenClaims {
            sub: user_id.to_string(),
            ver: token_version,
            jti: Uuid::new_v4().to_string(),
            iat,
            exp: iat + self.config.refresh_token_expiry as usize,
        };

        Ok(TokenPair {
            access_token: sign(&access, &self.config.access_secret)?,
            refresh_token: sign(&refresh, &self.config.refresh_secret)?,
        })
    }

    /// Verifies an access token's signature and expiry.
    ///
    /// This does not consult the store. Callers that need the user to still
    /// exist (the session middleware) resolve it themselves.
    pub fn validate_access(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let claims: Claims = verify(token, &self.config.access_secret)?;
        verified(&claims.sub, claims.ver)
    }

    /// Verifies a refresh token against the refresh secret.
    pub fn validate_refresh(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let claims: RefreshTokenClaims = verify(token, &self.config.refresh_secret)?;
        verified(&claims.sub, claims.ver)
    }

    /// Mints the `state` for one Google sign-in attempt.
    pub fn issue_oauth_state(&self) -> Result<String, TokenError> {
        self.issue_oauth_state_at(Utc::now().timestamp())
    }

    pub fn issue_oauth_state_at(&self, issued_at: i64) -> Result<String, TokenError> {
        let claims = OAuthStateClaims {
            purpose: OAuthStateClaims::PURPOSE.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: issued_at as usize,
            exp: (issued_at + OAUTH_STATE_TTL_SECONDS) as usize,
        };
        sign(&claims, &self.config.access_secret)
    }

    /// Checks that `state` was minted here and has not expired.
    pub fn validate_oauth_state(&self, state: &str) -> Result<(), TokenError> {
        let claims: OAuthStateClaims = verify(state, &self.config.access_secret)?;
        if claims.purpose != OAuthStateClaims::PURPOSE {
            return Err(TokenError::Invalid);
        }
        Ok(())
    }

    /// Exchanges a refresh token for a new pair.
    ///
    /// The user is re-resolved through `users`, so a soft-deleted user or a
    /// token from before a version bump cannot refresh. Outstanding access
    /// tokens are left alone and stay valid until they expire.
    ///
    /// # Errors
    ///
    /// 401 "Invalid refresh token" on any validation or lookup miss.
    pub async fn rotate<L>(&self, refresh_token: &str, users: &L) -> Result<TokenPair, AppError>
    where
        L: UserLookup + ?Sized,
    {
        const INVALID: &str = "Invalid refresh token";

        let token = self.validate_refresh(refresh_token).map_err(|e| {
            debug!(error = %e, "Refresh token rejected");
            e.into_app_error(INVALID)
        })?;

        match users.active_token_version(token.user_id).await? {
            Some(current) if current == token.token_version => self
                .issue_token_pair(token.user_id, current)
                .map_err(|e| e.into_app_error(INVALID)),
            Some(_) => {
                warn!(user_id = %token.user_id, "Refresh token from a revoked token version");
                Err(AppError::unauthorized(INVALID.to_string()))
            }
            None => {
                warn!(user_id = %token.user_id, "Refresh token for missing or deleted user");
                Err(AppError::unauthorized(INVALID.to_string()))
            }
        }
    }
}

fn sign<T: Serialize>(claims: &T, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

fn verify<T: DeserializeOwned>(token: &str, secret: &str) -> Result<T, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<T>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}

fn verified(sub: &str, token_version: i32) -> Result<VerifiedToken, TokenError> {
    let user_id = Uuid::parse_str(sub).map_err(|_| TokenError::Invalid)?;
    Ok(VerifiedToken {
        user_id,
        token_version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            access_secret: "test_access_secret".to_string(),
            refresh_secret: "test_refresh_secret".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
        }
    }

    fn service() -> TokenService {
        TokenService::new(get_test_jwt_config())
    }

    struct FakeUsers(HashMap<Uuid, i32>);

    #[async_trait]
    impl UserLookup for FakeUsers {
        async fn active_token_version(&self, user_id: Uuid) -> Result<Option<i32>, AppError> {
            Ok(self.0.get(&user_id).copied())
        }
    }

    #[test]
    fn test_issue_and_validate_access() {
        let user_id = Uuid::new_v4();
        let pair = service().issue_token_pair(user_id, 0).unwrap();

        let verified = service().validate_access(&pair.access_token).unwrap();
        assert_eq!(verified.user_id, user_id);
        assert_eq!(verified.token_version, 0);
    }

    #[test]
    fn test_pair_tokens_are_distinct() {
        let pair = service().issue_token_pair(Uuid::new_v4(), 0).unwrap();
        assert_ne!(pair.access_token, pair.refresh_token);
    }

    #[test]
    fn test_access_and_refresh_are_not_interchangeable() {
        let pair = service().issue_token_pair(Uuid::new_v4(), 0).unwrap();

        assert_eq!(
            service().validate_access(&pair.refresh_token),
            Err(TokenError::Invalid)
        );
        assert_eq!(
            service().validate_refresh(&pair.access_token),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_validate_garbage_token() {
        assert_eq!(
            service().validate_access("invalid.token.here"),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_validate_wrong_secret() {
        let pair = service().issue_token_pair(Uuid::new_v4(), 0).unwrap();

        let mut other = get_test_jwt_config();
        other.access_secret = "another_secret".to_string();
        assert_eq!(
            TokenService::new(other).validate_access(&pair.access_token),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_access_token_expires() {
        let config = get_test_jwt_config();
        let issued_at = Utc::now().timestamp() - config.access_token_expiry - 5;
        let pair = service()
            .issue_token_pair_at(Uuid::new_v4(), 0, issued_at)
            .unwrap();

        assert_eq!(
            service().validate_access(&pair.access_token),
            Err(TokenError::Expired)
        );
        // the refresh window is longer, so the refresh token still verifies
        assert!(service().validate_refresh(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_refresh_token_expiry_longer_than_access() {
        let pair = service().issue_token_pair(Uuid::new_v4(), 0).unwrap();
        let access: Claims = verify(&pair.access_token, "test_access_secret").unwrap();
        let refresh: RefreshTokenClaims =
            verify(&pair.refresh_token, "test_refresh_secret").unwrap();
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn test_non_uuid_subject_is_invalid() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            ver: 0,
            jti: "x".to_string(),
            iat: Utc::now().timestamp() as usize,
            exp: Utc::now().timestamp() as usize + 60,
        };
        let token = sign(&claims, "test_access_secret").unwrap();
        assert_eq!(service().validate_access(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_oauth_state_round_trip() {
        let state = service().issue_oauth_state().unwrap();
        assert!(service().validate_oauth_state(&state).is_ok());
        assert_ne!(state, service().issue_oauth_state().unwrap());
    }

    #[test]
    fn test_oauth_state_rejects_tokens_and_stale_state() {
        let pair = service().issue_token_pair(Uuid::new_v4(), 0).unwrap();
        assert_eq!(
            service().validate_oauth_state(&pair.access_token),
            Err(TokenError::Invalid)
        );
        assert_eq!(
            service().validate_oauth_state("not-a-state"),
            Err(TokenError::Invalid)
        );

        let issued_at = Utc::now().timestamp() - OAUTH_STATE_TTL_SECONDS - 5;
        let stale = service().issue_oauth_state_at(issued_at).unwrap();
        assert_eq!(
            service().validate_oauth_state(&stale),
            Err(TokenError::Expired)
        );

        let state = service().issue_oauth_state().unwrap();
        assert_eq!(service().validate_access(&state), Err(TokenError::Invalid));
    }

    #[tokio::test]
    async fn test_rotate_issues_new_pair_and_keeps_old_access_valid() {
        let user_id = Uuid::new_v4();
        let users = FakeUsers(HashMap::from([(user_id, 0)]));
        let first = service().issue_token_pair(user_id, 0).unwrap();

        let second = service().rotate(&first.refresh_token, &users).await.unwrap();

        assert_ne!(first.access_token, second.access_token);
        assert_eq!(
            service().validate_access(&second.access_token).unwrap().user_id,
            user_id
        );
        assert_eq!(
            service().validate_access(&first.access_token).unwrap().user_id,
            user_id
        );
    }

    #[tokio::test]
    async fn test_rotate_rejects_missing_user() {
        let users = FakeUsers(HashMap::new());
        let pair = service().issue_token_pair(Uuid::new_v4(), 0).unwrap();

        let err = service().rotate(&pair.refresh_token, &users).await.unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
        assert_eq!(err.error.to_string(), "Invalid refresh token");
    }

    #[tokio::test]
    async fn test_rotate_rejects_stale_version() {
        let user_id = Uuid::new_v4();
        let users = FakeUsers(HashMap::from([(user_id, 1)]));
        let pair = service().issue_token_pair(user_id, 0).unwrap();

        assert!(service().rotate(&pair.refresh_token, &users).await.is_err());
    }

    #[tokio::test]
    async fn test_rotate_rejects_access_token() {
        let user_id = Uuid::new_v4();
        let users = FakeUsers(HashMap::from([(user_id, 0)]));
        let pair = service().issue_token_pair(user_id, 0).unwrap();

        assert!(service().rotate(&pair.access_token, &users).await.is_err());
    }
}
