//! Pipeline entry point for notifier runs.
//!
//! - `Notifier::run`: crawl the listing, resolve availability, publish

pub mod run;

pub use run::{Notifier, RunReport, RunState};
