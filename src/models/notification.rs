//! Outbound notification structures.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date captured once when a run starts, used in subject and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTimestamp(NaiveDate);

impl RunTimestamp {
    /// Capture the current local date.
    pub fn now() -> Self {
        Self::from(Local::now())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Locale-stable display form, e.g. `Mon, 19 Oct 2026`.
    pub fn display(&self) -> String {
        self.0.format("%a, %d %b %Y").to_string()
    }
}

impl From<DateTime<Local>> for RunTimestamp {
    fn from(value: DateTime<Local>) -> Self {
        Self(value.date_naive())
    }
}

/// Subject and plaintext body for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

/// Message handed to the mail queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationPayload {
    pub domain: String,
    pub sender: String,
    pub recipients: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub plaintext: String,
    pub html: String,
}

impl NotificationPayload {
    /// Build a plaintext-only payload with empty `cc`/`bcc`.
    pub fn plaintext(
        domain: &str,
        sender: &str,
        recipients: &[String],
        notification: &Notification,
    ) -> Self {
        Self {
            domain: domain.to_string(),
            sender: sender.to_string(),
            recipients: recipients.to_vec(),
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: notification.subject.clone(),
            plaintext: notification.body.clone(),
            html: String::new(),
        }
    }
}
