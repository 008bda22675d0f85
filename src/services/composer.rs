// src/services/composer.rs

//! Notification composer.
//!
//! Renders the available courses into a plaintext message:
//!
//! ```text
//! <preamble>
//!
//! Courses available as of Mon, 19 Oct 2026:
//!
//! ---
//! Adult Improvers
//! Date: Sat 3 Nov
//! Time: 10:00 - 11:00
//! Price: £90.00
//! Booking URL: https://site/Coaching/Course/1
//! ```

use crate::models::{Course, Notification, NotifyConfig, RunTimestamp};
use crate::utils::url;

const COURSE_BLOCK: &str = "\n---\n{title}\nDate: {date}\nTime: {time}\nPrice: {price}\n";

/// Builds subject and body for a run.
pub struct NotificationComposer {
    subject_prefix: String,
    preamble: String,
}

impl NotificationComposer {
    pub fn new(config: &NotifyConfig) -> Self {
        Self {
            subject_prefix: config.subject_prefix.clone(),
            preamble: config.preamble.clone(),
        }
    }

    pub fn subject(&self, timestamp: &RunTimestamp) -> String {
        format!("{} ({})", self.subject_prefix, timestamp.display())
    }

    /// Compose the notification; an empty course list yields a body with no blocks.
    pub fn compose(
        &self,
        base_url: &str,
        courses: &[Course],
        timestamp: &RunTimestamp,
    ) -> Notification {
        let mut body = String::new();
        if !self.preamble.is_empty() {
            body.push_str(&self.preamble);
            body.push_str("\n\n");
        }
        body.push_str(&format!("Courses available as of {}:\n", timestamp.display()));

        for course in courses {
            body.push_str(&course.format(COURSE_BLOCK));
            body.push_str(&format!(
                "Booking URL: {}\n",
                url::join(base_url, &course.detail_path)
            ));
        }

        Notification {
            subject: self.subject(timestamp),
            body,
        }
    }
}
