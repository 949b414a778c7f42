//! Client configuration: where the API lives and which key to use.

use std::fmt;

use thiserror::Error;

/// Base URL used when none is configured.
pub const DEFAULT_API_BASE: &str = "http://api-m2x.att.com/v1";

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "M2X_API_KEY";

/// Environment variable overriding the base URL.
pub const API_BASE_VAR: &str = "M2X_API_BASE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("environment variable {0} is not valid unicode")]
    InvalidVar(&'static str),
}

/// Base URL and credential of one client.
///
/// The key belongs to the client built from this config and to nothing
/// else; it is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_base: String,
    api_key: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Point the client at another deployment. A trailing `/` is dropped.
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// Read `M2X_API_KEY` and, when set, `M2X_API_BASE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = read_var(API_KEY_VAR)?.ok_or(ConfigError::MissingVar(API_KEY_VAR))?;
        let config = Self::new(api_key);
        Ok(match read_var(API_BASE_VAR)? {
            Some(base) => config.with_api_base(&base),
            None => config,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn read_var(name: &'static str) -> Result<Option<String>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidVar(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_public_endpoint() {
        let config = ClientConfig::new("abc");
        assert_eq!(config.api_base(), "http://api-m2x.att.com/v1");
        assert_eq!(config.api_key(), "abc");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("abc").with_api_base("http://localhost:3000/v1/");
        assert_eq!(config.api_base(), "http://localhost:3000/v1");
    }

    #[test]
    fn debug_hides_key() {
        let rendered = format!("{:?}", ClientConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("api-m2x.att.com"));
    }
}
