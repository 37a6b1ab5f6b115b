//! Configuration for credential issuance

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Fixed credential time-to-live (30 minutes)
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 30 * 60;

/// Refresh period (4 minutes), safely under the ttl so clock drift or
/// scheduling jitter cannot let a credential lapse between refreshes
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 4 * 60;

/// Configuration for the credential issuer
///
/// The signing key, secret, and server URL are required; validation happens
/// when a credential is requested, not at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// Signing key id, embedded in tokens as the issuer
    #[serde(default)]
    pub api_key: String,

    /// Shared secret used to sign tokens
    #[serde(default)]
    pub api_secret: String,

    /// Real-time endpoint clients connect to with an issued credential
    #[serde(default)]
    pub server_url: String,

    /// Credential lifetime in seconds
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// Refresh period in seconds
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

fn default_token_ttl_secs() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

fn default_refresh_interval_secs() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            server_url: String::new(),
            token_ttl_secs: default_token_ttl_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

impl CredentialConfig {
    /// Create a config with the given signing key, secret, and server URL
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        server_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    /// Read configuration from `TALKIE_API_KEY`, `TALKIE_API_SECRET`, and
    /// `TALKIE_SERVER_URL`
    ///
    /// Missing variables leave the fields empty; the error surfaces on the
    /// first issuance attempt.
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("TALKIE_API_KEY").unwrap_or_default(),
            api_secret: env::var("TALKIE_API_SECRET").unwrap_or_default(),
            server_url: env::var("TALKIE_SERVER_URL").unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Check that every required field is present and the URL parses
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.api_secret.is_empty() {
            return Err(ConfigError::MissingApiSecret);
        }
        if self.server_url.is_empty() {
            return Err(ConfigError::MissingServerUrl);
        }
        Url::parse(&self.server_url)
            .map_err(|_| ConfigError::InvalidServerUrl(self.server_url.clone()))?;
        Ok(())
    }

    /// Parsed endpoint URL clients should connect to
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        if self.server_url.is_empty() {
            return Err(ConfigError::MissingServerUrl);
        }
        Url::parse(&self.server_url)
            .map_err(|_| ConfigError::InvalidServerUrl(self.server_url.clone()))
    }

    /// Credential lifetime
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    /// Refresh period
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CredentialConfig::default();
        assert!(config.api_key.is_empty());
        assert_eq!(config.token_ttl_secs, 1800);
        assert_eq!(config.refresh_interval_secs, 240);
    }

    #[test]
    fn test_new_config() {
        let config = CredentialConfig::new("key", "secret", "wss://rtc.example.com");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.server_url, "wss://rtc.example.com");
        assert_eq!(config.token_ttl_secs, 1800);
    }

    #[test]
    fn test_validate_complete_config() {
        let config = CredentialConfig::new("key", "secret", "wss://rtc.example.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_key() {
        let config = CredentialConfig::new("", "secret", "wss://rtc.example.com");
        assert_eq!(config.validate(), Err(ConfigError::MissingApiKey));
    }

    #[test]
    fn test_validate_missing_secret() {
        let config = CredentialConfig::new("key", "", "wss://rtc.example.com");
        assert_eq!(config.validate(), Err(ConfigError::MissingApiSecret));
    }

    #[test]
    fn test_validate_missing_url() {
        let config = CredentialConfig::new("key", "secret", "");
        assert_eq!(config.validate(), Err(ConfigError::MissingServerUrl));
    }

    #[test]
    fn test_validate_invalid_url() {
        let config = CredentialConfig::new("key", "secret", "not a url");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidServerUrl(_))
        ));
    }

    #[test]
    fn test_endpoint_parses() {
        let config = CredentialConfig::new("key", "secret", "wss://rtc.example.com");
        let endpoint = config.endpoint().unwrap();
        assert_eq!(endpoint.scheme(), "wss");
    }

    #[test]
    fn test_durations() {
        let config = CredentialConfig::default();
        assert_eq!(config.token_ttl(), Duration::from_secs(1800));
        assert_eq!(config.refresh_interval(), Duration::from_secs(240));
    }

    #[test]
    fn test_deserialize_toml() {
        let toml = r#"
            api_key = "key"
            api_secret = "secret"
            server_url = "wss://rtc.example.com"
        "#;
        let config: CredentialConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.api_key, "key");
        assert_eq!(config.token_ttl_secs, 1800); // default
    }
}
