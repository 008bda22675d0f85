//! Per-run crawl parameters.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Parameters for a single notifier run.
///
/// Serialized with the trigger's wire names (`baseURL`, `maxTries`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrawlParameters {
    /// Site root, e.g. `https://communitytennis.aeltc.com`
    #[serde(rename = "baseURL")]
    pub base_url: String,

    /// Render without a visible window
    #[serde(default = "defaults::headless")]
    pub headless: bool,

    /// Upper bound on listing page visits
    #[serde(rename = "maxTries")]
    pub max_pages: u32,

    /// Skip ladies-only courses before visiting detail pages
    #[serde(rename = "excludeLadies", default = "defaults::exclude_ladies")]
    pub exclude_ladies: bool,

    /// Mail domain handed to the downstream mailer
    #[serde(rename = "mailServer")]
    pub mail_server: String,

    pub sender: String,

    pub recipients: Vec<String>,
}

impl CrawlParameters {
    /// Check required fields before any navigation happens.
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.base_url)
            .map_err(|e| AppError::config(format!("baseURL '{}' is invalid: {e}", self.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(AppError::config(format!(
                "baseURL must be http(s), got '{}'",
                base.scheme()
            )));
        }
        if self.mail_server.trim().is_empty() {
            return Err(AppError::config("mailServer is empty"));
        }
        if self.sender.trim().is_empty() {
            return Err(AppError::config("sender is empty"));
        }
        if self.recipients.is_empty() {
            return Err(AppError::config("no recipients given"));
        }
        if self.recipients.iter().any(|r| r.trim().is_empty()) {
            return Err(AppError::config("recipients contains an empty address"));
        }
        Ok(())
    }
}

impl Default for CrawlParameters {
    fn default() -> Self {
        Self {
            base_url: "https://communitytennis.aeltc.com".to_string(),
            headless: defaults::headless(),
            max_pages: 5,
            exclude_ladies: defaults::exclude_ladies(),
            mail_server: "mail-server".to_string(),
            sender: "sender@example.org".to_string(),
            recipients: vec!["your-email@example.org".to_string()],
        }
    }
}

mod defaults {
    pub fn headless() -> bool {
        true
    }
    pub fn exclude_ladies() -> bool {
        true
    }
}
