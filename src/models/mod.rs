// src/models/mod.rs

//! Domain models for the notifier.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod course;
mod notification;
mod params;

// Re-export all public types
pub use config::{Config, CrawlerConfig, NotifyConfig, SiteConfig};
pub use course::{Course, ResolvedCourses, fields};
pub use notification::{Notification, NotificationPayload, RunTimestamp};
pub use params::CrawlParameters;
