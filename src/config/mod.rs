//! Configuration management.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::harvest::HarvestError;

/// The base URL for ComicVine.
pub const DEFAULT_BASE_URL: &str = "https://comicvine.gamespot.com";

/// The smallest permitted inter-page delay, in seconds. A configured value
/// below this is clamped up, never down.
pub const MINIMUM_DELAY_SECONDS: u64 = 1;

/// Configuration for a harvest: endpoint, credential, and rate-limit delay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Base resource endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// ComicVine API key
    #[serde(default)]
    pub api_key: String,

    /// Delay between page fetches, in seconds
    #[serde(default = "default_delay_seconds")]
    pub delay_seconds: u64,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            delay_seconds: default_delay_seconds(),
        }
    }
}

impl HarvestConfig {
    /// Create a configuration with the given API key and default endpoint and
    /// delay.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Build a configuration from environment variables
    /// (`COMICVINE_API_KEY`, `COMICVINE_DELAY`, `COMICVINE_BASE_URL`).
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = std::env::var("COMICVINE_API_KEY") {
            config.api_key = key;
        }
        if let Ok(url) = std::env::var("COMICVINE_BASE_URL") {
            config.base_url = url;
        }
        if let Some(delay) = std::env::var("COMICVINE_DELAY")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.delay_seconds = delay;
        }
        config
    }

    /// Load a TOML configuration file, filling the API key from the
    /// environment when the file leaves it empty.
    pub fn load(path: &Path) -> Result<Self, HarvestError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            HarvestError::MissingConfiguration(format!(
                "cannot read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let mut config: Self = toml::from_str(&raw).map_err(|e| {
            HarvestError::MissingConfiguration(format!(
                "cannot parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        if config.api_key.is_empty() {
            if let Ok(key) = std::env::var("COMICVINE_API_KEY") {
                config.api_key = key;
            }
        }
        Ok(config)
    }

    /// Check that everything a harvest needs is present.
    pub fn validate(&self) -> Result<(), HarvestError> {
        if self.api_key.is_empty() {
            return Err(HarvestError::MissingConfiguration("API key".to_string()));
        }
        if self.base_url.is_empty() {
            return Err(HarvestError::MissingConfiguration("base URL".to_string()));
        }
        Ok(())
    }

    /// The inter-page delay, clamped up to [`MINIMUM_DELAY_SECONDS`].
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_seconds.max(MINIMUM_DELAY_SECONDS))
    }

    /// The last four characters of the API key, for logging.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        let start = chars.len().saturating_sub(4);
        chars[start..].iter().collect()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_delay_seconds() -> u64 {
    MINIMUM_DELAY_SECONDS
}
