//! # Configuration
//!
//! Layered settings for the feed engine: built-in defaults, an optional
//! `feedsync.toml`, then `FEED_`-prefixed environment overrides (highest
//! precedence; `__` separates nesting, e.g. `FEED_REALTIME__KEY`). `.env`
//! files are honored before the environment is read.

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Build(#[from] config::ConfigError),
}

/// Settings consumed by the engine and its realtime binding.
#[derive(Debug, Deserialize)]
pub struct FeedConfig {
    /// Fixed page size for activity fetches.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Acting user id; the demo binary falls back to 1 when unset.
    #[serde(default)]
    pub current_user: Option<i64>,

    #[serde(default)]
    pub realtime: RealtimeConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct RealtimeConfig {
    /// Broker API key. Wrapped so it never shows up in logs.
    #[serde(default)]
    pub key: Option<SecretString>,
}

fn default_page_size() -> u32 {
    10
}

impl FeedConfig {
    /// Loads the layered configuration. A missing file is fine; a malformed
    /// one is not.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = Config::builder()
            .add_source(File::with_name("feedsync").required(false))
            .add_source(Environment::with_prefix("FEED").separator("__"))
            .build()?
            .try_deserialize::<Self>()?;
        debug!(page_size = config.page_size, "configuration loaded");
        Ok(config)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            current_user: None,
            realtime: RealtimeConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_any_source() {
        let config = FeedConfig::default();
        assert_eq!(config.page_size, 10);
        assert!(config.current_user.is_none());
        assert!(config.realtime.key.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let config: FeedConfig = Config::builder()
            .add_source(config::File::from_str(
                "page_size = 25\ncurrent_user = 7\n[realtime]\nkey = \"s3cret\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.current_user, Some(7));
        assert!(config.realtime.key.is_some());
    }
}
