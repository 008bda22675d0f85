// src/error.rs

//! Unified error handling for the notifier.

use std::fmt;

use thiserror::Error;

/// Result type alias for notifier operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// The rendering engine could not load a page
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// A page did not have the expected structure
    #[error("Extraction error for {context}: {message}")]
    Extraction { context: String, message: String },

    /// The queue client rejected or failed to transmit a message
    #[error("Publish error: {0}")]
    Publish(String),

    /// Configuration or trigger parameter error
    #[error("Configuration error: {0}")]
    Config(String),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client construction failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

/// Coarse failure categories reported to the caller of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Navigation,
    Extraction,
    Publish,
    Configuration,
}

impl AppError {
    /// Create a navigation error for a URL.
    pub fn navigation(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Navigation {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create an extraction error with context.
    pub fn extraction(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Extraction {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a publish error.
    pub fn publish(message: impl fmt::Display) -> Self {
        Self::Publish(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Classify this error into one of the run failure categories.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Navigation { .. } | Self::Http(_) => ErrorKind::Navigation,
            Self::Extraction { .. } | Self::Selector { .. } => ErrorKind::Extraction,
            Self::Publish(_) | Self::Io(_) | Self::Json(_) => ErrorKind::Publish,
            Self::Config(_) | Self::Toml(_) | Self::Url(_) => ErrorKind::Configuration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_groups_variants() {
        assert_eq!(
            AppError::navigation("https://x", "timeout").kind(),
            ErrorKind::Navigation
        );
        assert_eq!(
            AppError::selector("[[", "bad").kind(),
            ErrorKind::Extraction
        );
        assert_eq!(AppError::publish("nack").kind(), ErrorKind::Publish);
        assert_eq!(
            AppError::config("no recipients").kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn display_includes_url() {
        let err = AppError::navigation("https://example.com/a", "404 Not Found");
        assert_eq!(
            err.to_string(),
            "Navigation to https://example.com/a failed: 404 Not Found"
        );
    }
}
