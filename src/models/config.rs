//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::CrawlParameters;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Listing and detail page structure
    #[serde(default)]
    pub site: SiteConfig,

    /// Notification rendering and publishing
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Parameters used when a trigger carries none
    #[serde(default)]
    pub defaults: CrawlParameters,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::config("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::config("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::config("crawler.max_concurrent must be > 0"));
        }
        for (name, selector) in self.site.selectors() {
            if selector.trim().is_empty() {
                return Err(AppError::config(format!("site.{name} is empty")));
            }
            scraper::Selector::parse(selector)
                .map_err(|e| AppError::config(format!("site.{name} is invalid: {e:?}")))?;
        }
        if self.site.availability_marker.is_empty() {
            return Err(AppError::config("site.availability_marker is empty"));
        }
        if self.notify.topic.trim().is_empty() {
            return Err(AppError::config("notify.topic is empty"));
        }
        if self.notify.publish_attempts == 0 {
            return Err(AppError::config("notify.publish_attempts must be > 0"));
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between page visits in milliseconds
    #[serde(default)]
    pub request_delay_ms: u64,

    /// Detail page workers; 1 keeps every visit on the run's own session
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: 0,
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Listing and detail page structure of the coaching site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Listing path appended to the base URL
    #[serde(default = "defaults::listing_path")]
    pub listing_path: String,

    /// Query parameter carrying the result offset
    #[serde(default = "defaults::position_param")]
    pub position_param: String,

    /// Container that holds the listing results
    #[serde(default = "defaults::results_selector")]
    pub results_selector: String,

    /// One element per course inside the container
    #[serde(default = "defaults::item_selector")]
    pub item_selector: String,

    /// Course link; text is the title, `href` the detail path
    #[serde(default = "defaults::link_selector")]
    pub link_selector: String,

    #[serde(default = "defaults::address_selector")]
    pub address_selector: String,

    #[serde(default = "defaults::date_selector")]
    pub date_selector: String,

    #[serde(default = "defaults::time_selector")]
    pub time_selector: String,

    #[serde(default = "defaults::price_selector")]
    pub price_selector: String,

    /// Availability header on the detail page
    #[serde(default = "defaults::availability_selector")]
    pub availability_selector: String,

    /// Exact header text meaning spaces are open (case-sensitive)
    #[serde(default = "defaults::availability_marker")]
    pub availability_marker: String,

    /// Title substring identifying ladies-only courses
    #[serde(default = "defaults::exclusion_marker")]
    pub exclusion_marker: String,

    /// Stop paginating at the first page without results
    #[serde(default)]
    pub stop_on_empty_page: bool,
}

impl SiteConfig {
    /// All CSS selectors with their config key names.
    pub fn selectors(&self) -> [(&'static str, &str); 8] {
        [
            ("results_selector", self.results_selector.as_str()),
            ("item_selector", self.item_selector.as_str()),
            ("link_selector", self.link_selector.as_str()),
            ("address_selector", self.address_selector.as_str()),
            ("date_selector", self.date_selector.as_str()),
            ("time_selector", self.time_selector.as_str()),
            ("price_selector", self.price_selector.as_str()),
            ("availability_selector", self.availability_selector.as_str()),
        ]
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            listing_path: defaults::listing_path(),
            position_param: defaults::position_param(),
            results_selector: defaults::results_selector(),
            item_selector: defaults::item_selector(),
            link_selector: defaults::link_selector(),
            address_selector: defaults::address_selector(),
            date_selector: defaults::date_selector(),
            time_selector: defaults::time_selector(),
            price_selector: defaults::price_selector(),
            availability_selector: defaults::availability_selector(),
            availability_marker: defaults::availability_marker(),
            exclusion_marker: defaults::exclusion_marker(),
            stop_on_empty_page: false,
        }
    }
}

/// Notification rendering and publishing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Queue topic the mail payload is published to
    #[serde(default = "defaults::topic")]
    pub topic: String,

    /// Value of the `encoding` message attribute
    #[serde(default = "defaults::encoding")]
    pub encoding: String,

    /// Subject text before the run date
    #[serde(default = "defaults::subject_prefix")]
    pub subject_prefix: String,

    /// First paragraph of every message body
    #[serde(default = "defaults::preamble")]
    pub preamble: String,

    /// Total publish attempts, including the first
    #[serde(default = "defaults::publish_attempts")]
    pub publish_attempts: u32,

    #[serde(default = "defaults::retry_delay")]
    pub retry_delay_ms: u64,

    /// Do not publish when no course is available
    #[serde(default)]
    pub skip_when_empty: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            topic: defaults::topic(),
            encoding: defaults::encoding(),
            subject_prefix: defaults::subject_prefix(),
            preamble: defaults::preamble(),
            publish_attempts: defaults::publish_attempts(),
            retry_delay_ms: defaults::retry_delay(),
            skip_when_empty: false,
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; court-notifier/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        1
    }

    // Site defaults
    pub fn listing_path() -> String {
        "/Coaching/Adult".into()
    }
    pub fn position_param() -> String {
        "startPosition".into()
    }
    pub fn results_selector() -> String {
        "#results".into()
    }
    pub fn item_selector() -> String {
        "#results > div.result".into()
    }
    pub fn link_selector() -> String {
        ".description > h2 > a".into()
    }
    pub fn address_selector() -> String {
        ".description > .address > p".into()
    }
    pub fn date_selector() -> String {
        ".details ul > li.date".into()
    }
    pub fn time_selector() -> String {
        ".details ul > li.time".into()
    }
    pub fn price_selector() -> String {
        ".details ul > li.price".into()
    }
    pub fn availability_selector() -> String {
        // Class name is misspelled on the site itself.
        "div.detail-panel h3.availibility-header".into()
    }
    pub fn availability_marker() -> String {
        "Spaces are available".into()
    }
    pub fn exclusion_marker() -> String {
        "Ladies".into()
    }

    // Notify defaults
    pub fn topic() -> String {
        "emails".into()
    }
    pub fn encoding() -> String {
        "json-utf8".into()
    }
    pub fn subject_prefix() -> String {
        "Available Tennis Courses".into()
    }
    pub fn preamble() -> String {
        "IMPORTANT: If you want to be removed from the email list please reply to the sender of this message.".into()
    }
    pub fn publish_attempts() -> u32 {
        1
    }
    pub fn retry_delay() -> u64 {
        500
    }
}
