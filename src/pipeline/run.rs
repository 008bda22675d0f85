// src/pipeline/run.rs

//! Notifier run.
//!
//! Sequences one run end to end:
//!
//! ```text
//! Idle → SessionOpen → Paginating → Resolving → Filtering
//!      → Composing → Publishing → SessionClosed
//! ```
//!
//! The page session is closed on every exit path once it has been opened.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::models::{Config, CrawlParameters, RunTimestamp};
use crate::services::{
    AvailabilityResolver, CourseFilter, NotificationComposer, Paginator, Publisher,
};
use crate::session::{Browser, LaunchOptions, PageSession};

/// Stages of a run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunState {
    Idle,
    SessionOpen,
    Paginating,
    Resolving,
    Filtering,
    Composing,
    Publishing,
    SessionClosed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::SessionOpen => "session open",
            RunState::Paginating => "paginating",
            RunState::Resolving => "resolving",
            RunState::Filtering => "filtering",
            RunState::Composing => "composing",
            RunState::Publishing => "publishing",
            RunState::SessionClosed => "session closed",
        };
        f.write_str(name)
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Courses found on the listing
    pub listed: usize,
    /// Courses skipped by category
    pub excluded: usize,
    /// Courses whose detail page was checked
    pub resolved: usize,
    /// Courses included in the notification
    pub available: usize,
    /// Queue acknowledgment; `None` when publishing was skipped
    pub message_id: Option<String>,
}

/// Orchestrates crawl, enrichment and notification.
pub struct Notifier {
    browser: Arc<dyn Browser>,
    publisher: Publisher,
    paginator: Paginator,
    resolver: AvailabilityResolver,
    filter: CourseFilter,
    composer: NotificationComposer,
    workers: usize,
    skip_when_empty: bool,
}

impl Notifier {
    pub fn new(config: &Config, browser: Arc<dyn Browser>, publisher: Publisher) -> Self {
        let delay = Duration::from_millis(config.crawler.request_delay_ms);

        Self {
            browser,
            publisher,
            paginator: Paginator::new(&config.site, delay),
            resolver: AvailabilityResolver::new(&config.site, delay),
            filter: CourseFilter::new(config.site.exclusion_marker.clone()),
            composer: NotificationComposer::new(&config.notify),
            workers: config.crawler.max_concurrent.max(1),
            skip_when_empty: config.notify.skip_when_empty,
        }
    }

    /// Execute one run with `params`, stamping messages with `timestamp`.
    pub async fn run(
        &self,
        params: &CrawlParameters,
        timestamp: &RunTimestamp,
    ) -> Result<RunReport> {
        let mut state = RunState::Idle;
        params.validate()?;

        let options = LaunchOptions {
            headless: params.headless,
        };
        let mut session = self.browser.launch(&options).await?;
        advance(&mut state, RunState::SessionOpen);

        let outcome = self
            .drive(session.as_mut(), &mut state, params, &options, timestamp)
            .await;
        let closed = session.close().await;
        let failed_in = state;
        advance(&mut state, RunState::SessionClosed);

        match (outcome, closed) {
            (Ok(report), Ok(())) => {
                log::info!(
                    "Run complete: {} listed, {} excluded, {} available",
                    report.listed,
                    report.excluded,
                    report.available
                );
                Ok(report)
            }
            // Already published; a close failure no longer changes the outcome.
            (Ok(report), Err(e)) if report.message_id.is_some() => {
                log::warn!("Closing the page session failed after publishing: {}", e);
                Ok(report)
            }
            (Ok(_), Err(e)) => {
                log::error!("Closing the page session failed: {}", e);
                Err(e)
            }
            (Err(e), closed) => {
                if let Err(close_err) = closed {
                    log::warn!("Closing the page session failed: {}", close_err);
                }
                log::error!("Run failed while {}: {}", failed_in, e);
                Err(e)
            }
        }
    }

    async fn drive(
        &self,
        session: &mut dyn PageSession,
        state: &mut RunState,
        params: &CrawlParameters,
        options: &LaunchOptions,
        timestamp: &RunTimestamp,
    ) -> Result<RunReport> {
        let mut report = RunReport::default();

        advance(state, RunState::Paginating);
        let courses = self
            .paginator
            .collect(session, &params.base_url, params.max_pages)
            .await?;
        report.listed = courses.len();

        let courses = self
            .filter
            .exclude_by_category(courses, params.exclude_ladies);
        report.excluded = report.listed - courses.len();

        advance(state, RunState::Resolving);
        let resolved = if self.workers > 1 {
            self.resolver
                .resolve_pooled(
                    self.browser.as_ref(),
                    options,
                    &params.base_url,
                    courses,
                    self.workers,
                )
                .await?
        } else {
            self.resolver
                .resolve(session, &params.base_url, courses)
                .await?
        };

        report.resolved = resolved.len();

        advance(state, RunState::Filtering);
        let available = self.filter.select_available(resolved);
        report.available = available.len();

        advance(state, RunState::Composing);
        let notification = self
            .composer
            .compose(&params.base_url, &available, timestamp);

        if available.is_empty() && self.skip_when_empty {
            log::info!("No available courses; skipping notification");
            return Ok(report);
        }

        advance(state, RunState::Publishing);
        log::debug!(
            "Publishing {} course(s) to '{}'",
            available.len(),
            self.publisher.topic()
        );
        let message_id = self
            .publisher
            .publish(
                &params.mail_server,
                &params.sender,
                &params.recipients,
                &notification,
            )
            .await?;
        report.message_id = Some(message_id);

        Ok(report)
    }
}

fn advance(state: &mut RunState, next: RunState) {
    debug_assert!(next > *state, "run state moved backwards: {state} -> {next}");
    log::debug!("Run state: {} -> {}", state, next);
    *state = next;
}
