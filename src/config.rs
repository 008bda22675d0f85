// src/config.rs

//! Configuration loading utilities.
//!
//! This module provides convenience functions for loading configuration
//! from files and applying environment overrides.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Default config location for local runs.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Load configuration from a TOML file.
///
/// A missing file falls back to defaults; a malformed one is an error.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        log::warn!("No config at {}; using default configuration.", path.display());
        return Ok(Config::default());
    }
    Config::load(path).map_err(|e| AppError::config(format!("{}: {e}", path.display())))
}

/// Override config values from environment variables.
///
/// - `CRAWL_TIMEOUT_SECS`: HTTP request timeout
/// - `MAX_CONCURRENT`: Detail page workers
/// - `REQUEST_DELAY_MS`: Delay between page visits
/// - `NOTIFY_TOPIC`: Queue topic name or ARN
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(secs) = lookup("CRAWL_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        config.crawler.timeout_secs = secs;
    }
    if let Some(n) = lookup("MAX_CONCURRENT").and_then(|v| v.parse().ok()) {
        config.crawler.max_concurrent = n;
    }
    if let Some(ms) = lookup("REQUEST_DELAY_MS").and_then(|v| v.parse().ok()) {
        config.crawler.request_delay_ms = ms;
    }
    if let Some(topic) = lookup("NOTIFY_TOPIC").filter(|t| !t.trim().is_empty()) {
        config.notify.topic = topic;
    }
}

/// Load config from `CONFIG_PATH` (or the default path), apply overrides, validate.
pub fn from_env() -> Result<Config> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = load_config(Path::new(&path))?;
    apply_env_overrides(&mut config);
    config.validate()?;
    Ok(config)
}
