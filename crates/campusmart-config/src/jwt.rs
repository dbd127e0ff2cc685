use crate::{ConfigError, env_lookup, parse_or};

pub const DEFAULT_ACCESS_EXPIRY: i64 = 900; // 15 minutes
pub const DEFAULT_REFRESH_EXPIRY: i64 = 604800; // 7 days

/// Token signing configuration.
///
/// Access and refresh tokens are signed with different secrets so a leaked
/// access secret cannot mint refresh tokens, and vice versa.
#[derive(Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    /// Access token lifetime in seconds
    pub access_token_expiry: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_expiry: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .finish()
    }
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let access_secret = required_secret(&lookup, "JWT_ACCESS_SECRET")?;
        let refresh_secret = required_secret(&lookup, "JWT_REFRESH_SECRET")?;
        if access_secret == refresh_secret {
            return Err(ConfigError::Invalid {
                key: "JWT_REFRESH_SECRET",
                reason: "must differ from JWT_ACCESS_SECRET".to_string(),
            });
        }

        let access_token_expiry = parse_or(&lookup, "JWT_ACCESS_EXPIRY", DEFAULT_ACCESS_EXPIRY)?;
        let refresh_token_expiry =
            parse_or(&lookup, "JWT_REFRESH_EXPIRY", DEFAULT_REFRESH_EXPIRY)?;
        if access_token_expiry <= 0 || refresh_token_expiry <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_ACCESS_EXPIRY",
                reason: "token lifetimes must be positive".to_string(),
            });
        }

        Ok(Self {
            access_secret,
            refresh_secret,
            access_token_expiry,
            refresh_token_expiry,
        })
    }
}

fn required_secret(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lookup_from;

    #[test]
    fn test_loads_with_defaults() {
        let config = JwtConfig::from_lookup(lookup_from(&[
            ("JWT_ACCESS_SECRET", "access"),
            ("JWT_REFRESH_SECRET", "refresh"),
        ]))
        .unwrap();

        assert_eq!(config.access_token_expiry, DEFAULT_ACCESS_EXPIRY);
        assert_eq!(config.refresh_token_expiry, DEFAULT_REFRESH_EXPIRY);
    }

    #[test]
    fn test_missing_secret_fails() {
        let err = JwtConfig::from_lookup(lookup_from(&[("JWT_ACCESS_SECRET", "access")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_REFRESH_SECRET"));
    }

    #[test]
    fn test_blank_secret_counts_as_missing() {
        let err = JwtConfig::from_lookup(lookup_from(&[
            ("JWT_ACCESS_SECRET", "  "),
            ("JWT_REFRESH_SECRET", "refresh"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_ACCESS_SECRET"));
    }

    #[test]
    fn test_identical_secrets_rejected() {
        let err = JwtConfig::from_lookup(lookup_from(&[
            ("JWT_ACCESS_SECRET", "same"),
            ("JWT_REFRESH_SECRET", "same"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "JWT_REFRESH_SECRET", .. }));
    }

    #[test]
    fn test_custom_expiry() {
        let config = JwtConfig::from_lookup(lookup_from(&[
            ("JWT_ACCESS_SECRET", "access"),
            ("JWT_REFRESH_SECRET", "refresh"),
            ("JWT_ACCESS_EXPIRY", "60"),
            ("JWT_REFRESH_EXPIRY", "3600"),
        ]))
        .unwrap();
        assert_eq!(config.access_token_expiry, 60);
        assert_eq!(config.refresh_token_expiry, 3600);
    }

    #[test]
    fn test_non_numeric_expiry_rejected() {
        let result = JwtConfig::from_lookup(lookup_from(&[
            ("JWT_ACCESS_SECRET", "access"),
            ("JWT_REFRESH_SECRET", "refresh"),
            ("JWT_ACCESS_EXPIRY", "1h"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = JwtConfig::from_lookup(lookup_from(&[
            ("JWT_ACCESS_SECRET", "very-secret-a"),
            ("JWT_REFRESH_SECRET", "very-secret-r"),
        ]))
        .unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("very-secret"));
    }
}
