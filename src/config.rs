//! Configuration Management
//!
//! Handles persistent configuration storage for xbe.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://app.x-b-e.com";

/// Environment variable overriding the configured base URL
pub const BASE_URL_ENV: &str = "XBE_BASE_URL";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Base URL used when neither the flag nor the environment sets one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Stored API tokens, keyed by normalized base URL
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
}

/// Trim whitespace and trailing slashes so equivalent URLs share one token
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("xbe").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file. Missing or unreadable files
    /// yield the default configuration.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            anyhow::bail!("Could not determine the configuration directory");
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Get effective base URL (flag > XBE_BASE_URL > config > default)
    pub fn effective_base_url(&self, flag: Option<&str>) -> String {
        self.effective_base_url_with(flag, |key| std::env::var(key).ok())
    }

    pub fn effective_base_url_with<F>(&self, flag: Option<&str>, env: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        let chosen = non_blank(flag.map(str::to_string))
            .or_else(|| non_blank(env(BASE_URL_ENV)))
            .or_else(|| non_blank(self.base_url.clone()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        normalize_base_url(&chosen)
    }

    /// Stored token for a base URL
    pub fn token_for(&self, base_url: &str) -> Option<&str> {
        self.tokens
            .get(&normalize_base_url(base_url))
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
    }

    pub fn set_token(&mut self, base_url: &str, token: &str) {
        self.tokens
            .insert(normalize_base_url(base_url), token.trim().to_string());
    }

    /// Remove the token for a base URL, returning whether one was stored
    pub fn remove_token(&mut self, base_url: &str) -> bool {
        self.tokens.remove(&normalize_base_url(base_url)).is_some()
    }
}
