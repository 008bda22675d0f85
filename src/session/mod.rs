//! Page session capability.
//!
//! The crawl services only need to load a URL and query the resulting
//! document. `Browser` opens sessions, `PageSession` drives one of them.
//! [`HttpBrowser`] is the bundled engine; tests substitute scripted doubles.

mod http;

#[cfg(test)]
pub(crate) mod fake;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;

pub use http::{HttpBrowser, HttpPageSession};

/// One extracted item, keyed by [`FieldSpec::name`].
pub type Record = HashMap<String, String>;

/// Options for opening a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOptions {
    pub headless: bool,
}

/// Maps one output field to a selector relative to the item element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub selector: String,
    /// Read this attribute instead of the element text
    pub attribute: Option<String>,
}

impl FieldSpec {
    pub fn text(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector: selector.into(),
            attribute: None,
        }
    }

    pub fn attr(
        name: impl Into<String>,
        selector: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            selector: selector.into(),
            attribute: Some(attribute.into()),
        }
    }
}

/// Opens page sessions.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn PageSession>>;
}

/// A single rendering session positioned on at most one document.
#[async_trait]
pub trait PageSession: Send {
    /// Load `url` and make it the current document.
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Extract one record per element matching `item_selector`.
    ///
    /// Fails as a whole if any item lacks any field.
    async fn extract_list(
        &mut self,
        item_selector: &str,
        fields: &[FieldSpec],
    ) -> Result<Vec<Record>>;

    /// Normalized text of the first element matching `selector`, if any.
    async fn extract_field(&mut self, selector: &str) -> Result<Option<String>>;

    /// Release the session.
    async fn close(&mut self) -> Result<()>;
}

/// Collapse whitespace runs and trim, approximating rendered text.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
