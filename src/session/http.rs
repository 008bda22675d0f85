// src/session/http.rs

//! HTTP page sessions.
//!
//! Fetches documents with `reqwest` and queries them with `scraper`.
//! Pages are taken as served; no script execution happens.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;
use crate::session::{Browser, FieldSpec, LaunchOptions, PageSession, Record, normalize_text};

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &CrawlerConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Browser backed by a shared HTTP client.
#[derive(Clone)]
pub struct HttpBrowser {
    client: Client,
}

impl HttpBrowser {
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
        })
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn PageSession>> {
        log::debug!("Opening HTTP session (headless={})", options.headless);
        Ok(Box::new(HttpPageSession::new(self.client.clone())))
    }
}

/// The document a session currently points at.
struct LoadedPage {
    url: String,
    html: String,
}

/// Session holding the last fetched document.
pub struct HttpPageSession {
    client: Client,
    current: Option<LoadedPage>,
}

impl HttpPageSession {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            current: None,
        }
    }

    fn page(&self) -> Result<&LoadedPage> {
        self.current
            .as_ref()
            .ok_or_else(|| AppError::extraction("session", "no document loaded"))
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }

    fn read_field(item: &ElementRef, selector: &Selector, field: &FieldSpec) -> Option<String> {
        let elem = item.select(selector).next()?;
        match &field.attribute {
            Some(attr) => elem.value().attr(attr).map(|v| v.trim().to_string()),
            None => Some(normalize_text(&elem.text().collect::<String>())),
        }
    }

    fn extract_records(
        page: &LoadedPage,
        item_selector: &str,
        fields: &[FieldSpec],
    ) -> Result<Vec<Record>> {
        let item_sel = Self::parse_selector(item_selector)?;
        let field_sels = fields
            .iter()
            .map(|f| Self::parse_selector(&f.selector))
            .collect::<Result<Vec<_>>>()?;

        let document = Html::parse_document(&page.html);
        let mut records = Vec::new();

        for (index, item) in document.select(&item_sel).enumerate() {
            let mut record = Record::with_capacity(fields.len());
            for (field, selector) in fields.iter().zip(&field_sels) {
                let value = Self::read_field(&item, selector, field).ok_or_else(|| {
                    AppError::extraction(
                        page.url.as_str(),
                        format!(
                            "item {index} has no '{}' ({})",
                            field.name, field.selector
                        ),
                    )
                })?;
                record.insert(field.name.clone(), value);
            }
            records.push(record);
        }
        Ok(records)
    }

    fn first_text(page: &LoadedPage, selector: &str) -> Result<Option<String>> {
        let sel = Self::parse_selector(selector)?;
        let document = Html::parse_document(&page.html);
        Ok(document
            .select(&sel)
            .next()
            .map(|elem| normalize_text(&elem.text().collect::<String>())))
    }
}

#[async_trait]
impl PageSession for HttpPageSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::navigation(url, e))?;
        let html = response
            .text()
            .await
            .map_err(|e| AppError::navigation(url, e))?;

        self.current = Some(LoadedPage {
            url: url.to_string(),
            html,
        });
        Ok(())
    }

    async fn extract_list(
        &mut self,
        item_selector: &str,
        fields: &[FieldSpec],
    ) -> Result<Vec<Record>> {
        Self::extract_records(self.page()?, item_selector, fields)
    }

    async fn extract_field(&mut self, selector: &str) -> Result<Option<String>> {
        Self::first_text(self.page()?, selector)
    }

    async fn close(&mut self) -> Result<()> {
        self.current = None;
        Ok(())
    }
}
