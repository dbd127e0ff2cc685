//! JWT claim structures.
//!
//! - [`Claims`]: access token claims
//! - [`RefreshTokenClaims`]: refresh token claims
//! - [`OAuthStateClaims`]: the `state` round-tripped through Google sign-in
//!
//! Claims identify the user and nothing more. Role and deletion state are
//! resolved from the store on every request, so they never go stale inside
//! a token.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT claims for access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    /// Token version of the user when the token was issued
    pub ver: i32,
    /// Unique token identifier
    pub jti: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

/// JWT claims for refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    /// User ID (subject claim)
    pub sub: String,
    /// Token version of the user when the token was issued
    pub ver: i32,
    /// Unique token identifier
    pub jti: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

/// Claims of the signed `state` parameter sent to the identity provider.
///
/// Carries no subject, so it never verifies as an access or refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthStateClaims {
    /// Always [`OAuthStateClaims::PURPOSE`]
    pub purpose: String,
    pub jti: String,
    pub exp: usize,
    pub iat: usize,
}

impl OAuthStateClaims {
    pub const PURPOSE: &'static str = "oauth_state";
}
