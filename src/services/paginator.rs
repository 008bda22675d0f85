// src/services/paginator.rs

//! Listing paginator.
//!
//! Walks the course listing by result offset and accumulates every course
//! it finds, visiting at most `max_pages` listing pages.

use std::time::Duration;

use crate::error::Result;
use crate::models::{Course, SiteConfig, fields};
use crate::session::{FieldSpec, PageSession};
use crate::utils::url;

/// Service collecting courses from the paginated listing.
pub struct Paginator {
    listing_path: String,
    position_param: String,
    results_selector: String,
    item_selector: String,
    fields: Vec<FieldSpec>,
    stop_on_empty_page: bool,
    delay: Duration,
}

impl Paginator {
    /// Create a paginator for the given site layout.
    pub fn new(site: &SiteConfig, delay: Duration) -> Self {
        let fields = vec![
            FieldSpec::text(fields::TITLE, &site.link_selector),
            FieldSpec::attr(fields::DETAIL_PATH, &site.link_selector, "href"),
            FieldSpec::text(fields::ADDRESS, &site.address_selector),
            FieldSpec::text(fields::DATE, &site.date_selector),
            FieldSpec::text(fields::TIME, &site.time_selector),
            FieldSpec::text(fields::PRICE, &site.price_selector),
        ];

        Self {
            listing_path: site.listing_path.clone(),
            position_param: site.position_param.clone(),
            results_selector: site.results_selector.clone(),
            item_selector: site.item_selector.clone(),
            fields,
            stop_on_empty_page: site.stop_on_empty_page,
            delay,
        }
    }

    /// URL of the listing page starting at `position`.
    pub fn listing_url(&self, base_url: &str, position: usize) -> String {
        url::with_query(
            &url::join(base_url, &self.listing_path),
            &self.position_param,
            position,
        )
    }

    /// Collect courses across up to `max_pages` listing pages.
    ///
    /// Pages without results still use up an attempt unless
    /// `stop_on_empty_page` is set.
    pub async fn collect(
        &self,
        session: &mut dyn PageSession,
        base_url: &str,
        max_pages: u32,
    ) -> Result<Vec<Course>> {
        let mut courses = Vec::new();
        let mut position = 0;

        for attempt in 1..=max_pages {
            if attempt > 1 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let page_url = self.listing_url(base_url, position);
            log::debug!("Listing page {}/{}: {}", attempt, max_pages, page_url);
            session.navigate(&page_url).await?;

            let batch = self.extract_batch(session).await?;
            if batch.is_empty() {
                log::debug!("No results at position {}", position);
                if self.stop_on_empty_page {
                    break;
                }
                continue;
            }

            position += batch.len();
            log::info!(
                "Found {} course(s) at page {} ({} total)",
                batch.len(),
                attempt,
                position
            );
            courses.extend(batch);
        }

        Ok(courses)
    }

    async fn extract_batch(&self, session: &mut dyn PageSession) -> Result<Vec<Course>> {
        if session.extract_field(&self.results_selector).await?.is_none() {
            return Ok(Vec::new());
        }

        session
            .extract_list(&self.item_selector, &self.fields)
            .await?
            .iter()
            .map(Course::from_record)
            .collect()
    }
}
