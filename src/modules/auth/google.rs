//! Google sign-in through the OAuth 2.0 authorization code flow.

use async_trait::async_trait;
use campusmart_config::OAuthConfig;
use campusmart_core::AppError;
use campusmart_models::{Email, VerifiedIdentity};
use reqwest::Url;
use serde::Deserialize;
use tracing::warn;

use super::identity::IdentityProvider;

const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

const SIGN_IN_FAILED: &str = "Google sign-in failed";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserInfo {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    name: Option<String>,
}

pub struct GoogleIdentityProvider {
    config: OAuthConfig,
    client: reqwest::Client,
}

impl GoogleIdentityProvider {
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn exchange_code(&self, code: &str) -> Result<String, reqwest::Error> {
        let response: TokenResponse = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.access_token)
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<UserInfo, reqwest::Error> {
        self.client
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn authorize_url(&self, state: &str) -> Result<String, AppError> {
        let url = Url::parse_with_params(
            AUTHORIZE_ENDPOINT,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("response_type", "code"),
                ("scope", "openid email profile"),
                ("state", state),
            ],
        )
        .map_err(AppError::internal)?;

        Ok(url.into())
    }

    async fn verify(&self, code: &str) -> Result<VerifiedIdentity, AppError> {
        let access_token = self.exchange_code(code).await.map_err(|e| {
            warn!(error = %e, "Google code exchange failed");
            AppError::unauthorized(SIGN_IN_FAILED.to_string())
        })?;

        let info = self.fetch_user_info(&access_token).await.map_err(|e| {
            warn!(error = %e, "Google userinfo request failed");
            AppError::unauthorized(SIGN_IN_FAILED.to_string())
        })?;

        let email = info
            .email
            .filter(|_| info.email_verified)
            .and_then(|email| Email::new(email).ok())
            .ok_or_else(|| {
                warn!(subject = %info.sub, "Google account has no verified email");
                AppError::unauthorized(SIGN_IN_FAILED.to_string())
            })?;

        Ok(VerifiedIdentity {
            email,
            name: info.name,
            provider_id: info.sub,
        })
    }
}
