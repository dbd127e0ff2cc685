//! # Campusmart Auth
//!
//! Token issuance and validation for the Campusmart API.
//!
//! - [`claims`]: Claim structures carried by access and refresh tokens
//! - [`jwt`]: [`TokenService`], which mints, validates and rotates tokens
//!
//! # Token Types
//!
//! - **Access Token** ([`Claims`]): short-lived, sent as `Authorization: Bearer`
//!   on every request
//! - **Refresh Token** ([`RefreshTokenClaims`]): long-lived, only accepted by
//!   the refresh endpoint
//!
//! Each kind is signed with its own secret. Tokens are never persisted. Both
//! carry the user's token version so that a password change or an explicit
//! sign-out-everywhere invalidates every outstanding token for that user.
//!
//! # Example
//!
//! ```ignore
//! use campusmart_auth::TokenService;
//! use campusmart_config::JwtConfig;
//!
//! let tokens = TokenService::new(JwtConfig::from_env()?);
//! let pair = tokens.issue_token_pair(user_id, 0)?;
//! let verified = tokens.validate_access(&pair.access_token)?;
//! assert_eq!(verified.user_id, user_id);
//! ```

pub mod claims;
pub mod jwt;

use async_trait::async_trait;
use campusmart_core::AppError;
use uuid::Uuid;

// Re-export commonly used types at crate root
pub use claims::{Claims, OAuthStateClaims, RefreshTokenClaims};
pub use jwt::{TokenError, TokenPair, TokenService, VerifiedToken};

/// Read access to user state needed when rotating tokens.
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Returns the current token version of an active user, or `None` when
    /// the user does not exist or has been soft-deleted.
    async fn active_token_version(&self, user_id: Uuid) -> Result<Option<i32>, AppError>;
}
