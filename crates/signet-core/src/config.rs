//! Configuration management for signet.
//!
//! Loads configuration from `${SIGNET_HOME}/config.toml` with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the configured GraphQL endpoint.
pub const ENDPOINT_ENV: &str = "SIGNET_ENDPOINT";

/// Configuration loaded from config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GraphQL endpoint URL.
    pub endpoint: Option<String>,

    /// Default post-login destination (falls back to `/dashboard`).
    pub redirect: Option<String>,
}

impl Config {
    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }
}

/// Resolves the GraphQL endpoint with precedence: env > config.
///
/// There is no default endpoint; the remote API is deployment-specific.
pub fn resolve_endpoint(config_endpoint: Option<&str>) -> Result<String> {
    if let Ok(env_url) = std::env::var(ENDPOINT_ENV) {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    if let Some(config_url) = config_endpoint {
        let trimmed = config_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    anyhow::bail!("No endpoint configured. Set {ENDPOINT_ENV} or endpoint in config.toml.")
}

/// Validates that a URL is well-formed.
fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid endpoint URL: {url}"))?;
    Ok(())
}

pub mod paths {
    //! Path resolution for signet configuration and data.
    //!
    //! SIGNET_HOME resolution order:
    //! 1. SIGNET_HOME environment variable (if set)
    //! 2. ~/.config/signet (default)

    use std::path::PathBuf;

    /// Returns the signet home directory.
    pub fn signet_home() -> PathBuf {
        if let Ok(home) = std::env::var("SIGNET_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("signet"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        signet_home().join("config.toml")
    }

    /// Returns the path to the session store file.
    pub fn store_path() -> PathBuf {
        signet_home().join("store.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: defaults when the config file is absent.
    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(config.endpoint.is_none());
        assert!(config.redirect.is_none());
    }

    /// Test: parse a populated config file.
    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "endpoint = \"https://api.example.com/graphql\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.endpoint.as_deref(),
            Some("https://api.example.com/graphql")
        );
    }

    /// Test: a malformed config endpoint is rejected.
    #[test]
    fn test_resolve_endpoint_rejects_bad_url() {
        assert!(resolve_endpoint(Some("not a url")).is_err());
    }
}
