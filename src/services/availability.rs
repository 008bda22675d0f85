// src/services/availability.rs

//! Availability resolver.
//!
//! Visits each course's detail page and reads the availability header.

use std::time::Duration;

use futures::future::join_all;

use crate::error::Result;
use crate::models::{Course, ResolvedCourses, SiteConfig};
use crate::session::{Browser, LaunchOptions, PageSession};
use crate::utils::url;

/// Service resolving the `available` flag of courses.
pub struct AvailabilityResolver {
    selector: String,
    marker: String,
    delay: Duration,
}

impl AvailabilityResolver {
    pub fn new(site: &SiteConfig, delay: Duration) -> Self {
        Self {
            selector: site.availability_selector.clone(),
            marker: site.availability_marker.clone(),
            delay,
        }
    }

    /// Exact, case-sensitive comparison against the marker text.
    pub fn is_available(&self, header: Option<&str>) -> bool {
        header == Some(self.marker.as_str())
    }

    /// Resolve every course in order on a single session.
    pub async fn resolve(
        &self,
        session: &mut dyn PageSession,
        base_url: &str,
        courses: Vec<Course>,
    ) -> Result<ResolvedCourses> {
        let jobs: Vec<_> = courses.iter().enumerate().collect();
        let flags = self.visit_all(session, base_url, &jobs).await?;

        Ok(Self::apply(courses, flags))
    }

    /// Resolve courses with up to `workers` sessions opened from `browser`.
    ///
    /// Each worker owns its session and closes it when done; results come back
    /// in listing order regardless of completion order.
    pub async fn resolve_pooled(
        &self,
        browser: &dyn Browser,
        options: &LaunchOptions,
        base_url: &str,
        courses: Vec<Course>,
        workers: usize,
    ) -> Result<ResolvedCourses> {
        let workers = workers.clamp(1, courses.len().max(1));
        let mut partitions: Vec<Vec<(usize, &Course)>> = vec![Vec::new(); workers];
        for (index, course) in courses.iter().enumerate() {
            partitions[index % workers].push((index, course));
        }

        log::debug!(
            "Resolving {} course(s) with {} worker(s)",
            courses.len(),
            workers
        );

        let results = join_all(
            partitions
                .iter()
                .map(|jobs| self.run_worker(browser, options, base_url, jobs)),
        )
        .await;

        let mut flags = Vec::with_capacity(courses.len());
        for result in results {
            flags.extend(result?);
        }
        Ok(Self::apply(courses, flags))
    }

    async fn run_worker(
        &self,
        browser: &dyn Browser,
        options: &LaunchOptions,
        base_url: &str,
        jobs: &[(usize, &Course)],
    ) -> Result<Vec<(usize, bool)>> {
        let mut session = browser.launch(options).await?;
        let result = self.visit_all(session.as_mut(), base_url, jobs).await;

        if let Err(e) = session.close().await {
            log::warn!("Failed to close worker session: {}", e);
        }
        result
    }

    async fn visit_all(
        &self,
        session: &mut dyn PageSession,
        base_url: &str,
        jobs: &[(usize, &Course)],
    ) -> Result<Vec<(usize, bool)>> {
        let mut flags = Vec::with_capacity(jobs.len());

        for (n, (index, course)) in jobs.iter().enumerate() {
            if n > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let available = self.check(session, base_url, course).await?;
            flags.push((*index, available));
        }
        Ok(flags)
    }

    async fn check(
        &self,
        session: &mut dyn PageSession,
        base_url: &str,
        course: &Course,
    ) -> Result<bool> {
        session
            .navigate(&url::join(base_url, &course.detail_path))
            .await?;
        let header = session.extract_field(&self.selector).await?;
        let available = self.is_available(header.as_deref());

        log::info!(
            "{} on {} ({}), Availability: {}",
            course.title,
            course.date,
            course.time,
            available
        );
        Ok(available)
    }

    fn apply(mut courses: Vec<Course>, flags: Vec<(usize, bool)>) -> ResolvedCourses {
        for (index, available) in flags {
            courses[index].available = available;
        }
        ResolvedCourses::new(courses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::session::fake::{FakePage, ScriptedBrowser, course_record};

    const BASE: &str = "https://tennis.test";

    fn resolver() -> AvailabilityResolver {
        AvailabilityResolver::new(&SiteConfig::default(), Duration::ZERO)
    }

    fn course(title: &str, path: &str) -> Course {
        Course::from_record(&course_record(title, path)).unwrap()
    }

    fn site() -> ScriptedBrowser {
        ScriptedBrowser::new()
            .page(
                format!("{BASE}/c/a"),
                FakePage::detail(Some("Spaces are available")),
            )
            .page(format!("{BASE}/c/b"), FakePage::detail(Some("Fully booked")))
            .page(format!("{BASE}/c/c"), FakePage::detail(None))
            .page(
                format!("{BASE}/c/d"),
                FakePage::detail(Some("spaces are available")),
            )
            .page(
                format!("{BASE}/c/e"),
                FakePage::detail(Some("Spaces are available")),
            )
    }

    fn courses() -> Vec<Course> {
        ["a", "b", "c", "d", "e"]
            .iter()
            .map(|id| course(&id.to_uppercase(), &format!("/c/{id}")))
            .collect()
    }

    #[test]
    fn test_marker_is_exact_and_case_sensitive() {
        let r = resolver();
        assert!(r.is_available(Some("Spaces are available")));
        assert!(!r.is_available(Some("spaces are available")));
        assert!(!r.is_available(Some("Spaces are available!")));
        assert!(!r.is_available(Some("")));
        assert!(!r.is_available(None));
    }

    #[tokio::test]
    async fn test_resolve_sets_every_flag() {
        let browser = site();
        let mut session = browser.session();

        let resolved = resolver()
            .resolve(&mut session, BASE, courses())
            .await
            .unwrap();

        let flags: Vec<_> = resolved.iter().map(|c| (c.title.as_str(), c.available)).collect();
        assert_eq!(
            flags,
            [("A", true), ("B", false), ("C", false), ("D", false), ("E", true)]
        );
        assert_eq!(
            browser.navigations(),
            ["a", "b", "c", "d", "e"].map(|id| format!("{BASE}/c/{id}"))
        );
    }

    #[tokio::test]
    async fn test_navigation_failure_propagates() {
        let browser = site().failing(format!("{BASE}/c/c"));
        let mut session = browser.session();

        let err = resolver()
            .resolve(&mut session, BASE, courses())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Navigation { .. }));
        assert_eq!(browser.navigations().len(), 3);
    }

    #[tokio::test]
    async fn test_pooled_restores_listing_order() {
        let browser = site();

        let resolved = resolver()
            .resolve_pooled(
                &browser,
                &LaunchOptions { headless: true },
                BASE,
                courses(),
                3,
            )
            .await
            .unwrap();

        let titles: Vec<_> = resolved.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["A", "B", "C", "D", "E"]);
        let available: Vec<_> = resolved.iter().map(|c| c.available).collect();
        assert_eq!(available, [true, false, false, false, true]);
        assert_eq!(browser.launches(), 3);
        assert_eq!(browser.closes(), 3);
    }

    #[tokio::test]
    async fn test_pooled_closes_sessions_on_failure() {
        let browser = site().failing(format!("{BASE}/c/b"));

        let result = resolver()
            .resolve_pooled(
                &browser,
                &LaunchOptions { headless: true },
                BASE,
                courses(),
                2,
            )
            .await;

        assert!(result.is_err());
        assert_eq!(browser.launches(), 2);
        assert_eq!(browser.closes(), 2);
    }

    #[tokio::test]
    async fn test_pooled_with_no_courses() {
        let browser = site();

        let resolved = resolver()
            .resolve_pooled(&browser, &LaunchOptions { headless: true }, BASE, vec![], 4)
            .await
            .unwrap();

        assert!(resolved.is_empty());
        assert_eq!(browser.launches(), browser.closes());
    }
}
