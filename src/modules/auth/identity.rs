use async_trait::async_trait;
use campusmart_core::AppError;
use campusmart_models::VerifiedIdentity;

/// An external sign-in provider.
///
/// The handshake is opaque to the rest of the application: it sends the
/// browser to [`authorize_url`](Self::authorize_url) and later hands the
/// returned code to [`verify`](Self::verify), which yields an identity the
/// provider has vouched for.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Where to send the browser to start sign-in. `state` is echoed back on
    /// the callback.
    fn authorize_url(&self, state: &str) -> Result<String, AppError>;

    /// Exchanges an authorization code for a verified identity.
    async fn verify(&self, code: &str) -> Result<VerifiedIdentity, AppError>;
}
