use crate::{ConfigError, env_lookup};

/// Google sign-in credentials. Optional: when none of the variables are set
/// the OAuth routes report that sign-in is not configured.
#[derive(Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

const KEYS: [&str; 3] = ["GOOGLE_CLIENT_ID", "GOOGLE_CLIENT_SECRET", "GOOGLE_CALLBACK_URL"];

impl OAuthConfig {
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Returns `Ok(None)` when nothing is set and an error when only some of
    /// the variables are.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        let values: Vec<Option<String>> = KEYS
            .iter()
            .map(|key| lookup(key).filter(|v| !v.trim().is_empty()))
            .collect();

        if values.iter().all(Option::is_none) {
            return Ok(None);
        }

        let mut values = values.into_iter().zip(KEYS);
        let mut next = || {
            let (value, key) = values.next().ok_or(ConfigError::Missing(KEYS[0]))?;
            value.ok_or(ConfigError::Missing(key))
        };

        Ok(Some(Self {
            client_id: next()?,
            client_secret: next()?,
            callback_url: next()?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lookup_from;

    #[test]
    fn test_unconfigured_is_none() {
        assert!(OAuthConfig::from_lookup(lookup_from(&[])).unwrap().is_none());
    }

    #[test]
    fn test_fully_configured() {
        let config = OAuthConfig::from_lookup(lookup_from(&[
            ("GOOGLE_CLIENT_ID", "id"),
            ("GOOGLE_CLIENT_SECRET", "secret"),
            ("GOOGLE_CALLBACK_URL", "http://localhost:5000/api/auth/google/callback"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(config.client_id, "id");
    }

    #[test]
    fn test_partial_configuration_fails() {
        let err = OAuthConfig::from_lookup(lookup_from(&[("GOOGLE_CLIENT_ID", "id")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("GOOGLE_CLIENT_SECRET"));
    }
}
