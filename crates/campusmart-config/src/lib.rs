//! # Campusmart Config
//!
//! Configuration types for the Campusmart API, loaded once from environment
//! variables at startup and then shared read-only.
//!
//! - [`jwt`]: Access and refresh token secrets and lifetimes
//! - [`cors`]: Allowed browser origins
//! - [`server`]: Bind address and public URLs
//! - [`oauth`]: Optional Google sign-in credentials
//!
//! Every loader has a `from_env` entry point and a `from_lookup` variant that
//! takes any key lookup, which keeps tests away from process-wide state.
//!
//! # Example
//!
//! ```ignore
//! use campusmart_config::{JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let server_config = ServerConfig::from_env()?;
//! ```

pub mod cors;
pub mod jwt;
pub mod oauth;
pub mod server;

use thiserror::Error;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use oauth::OAuthConfig;
pub use server::ServerConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

pub(crate) fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            reason: format!("could not parse {:?}", value),
        }),
        None => Ok(default),
    }
}

pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;

    pub fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }
}
