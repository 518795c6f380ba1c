use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::provider::weatherapi::DEFAULT_BASE_URL;

/// Environment variable overriding the configured API key.
pub const API_KEY_ENV: &str = "CITYWEATHER_API_KEY";
/// Environment variable overriding the configured base URL.
pub const BASE_URL_ENV: &str = "CITYWEATHER_BASE_URL";

/// Key baked in when the binary was built with `CITYWEATHER_API_KEY` set.
const BUILD_API_KEY: Option<&str> = option_env!("CITYWEATHER_API_KEY");

/// Configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// base_url = "https://api.weatherapi.com/v1"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Request timeout; when absent only the transport's own limits apply.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Load from disk, then apply `CITYWEATHER_*` environment overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut cfg = Self::load()?;
        cfg.apply_overrides(env::var(API_KEY_ENV).ok(), env::var(BASE_URL_ENV).ok());
        Ok(cfg)
    }

    /// Replace fields with the given values; blank values are ignored.
    pub fn apply_overrides(&mut self, api_key: Option<String>, base_url: Option<String>) {
        if let Some(key) = non_blank(api_key) {
            self.api_key = Some(key);
        }
        if let Some(url) = non_blank(base_url) {
            self.base_url = Some(url);
        }
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "cityweather", "cityweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key from config, falling back to the one baked in at build time.
    pub fn api_key(&self) -> Result<String> {
        resolve_api_key(self.api_key.as_deref(), BUILD_API_KEY)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }
}

fn resolve_api_key<'a>(configured: Option<&'a str>, built_in: Option<&'a str>) -> Result<String> {
    let usable = |key: Option<&'a str>| key.map(str::trim).filter(|key| !key.is_empty());

    usable(configured)
        .or_else(|| usable(built_in))
        .map(str::to_string)
        .ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `cityweather configure` or set {API_KEY_ENV}."
            )
        })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
