//! Service layer for the notifier.
//!
//! This module contains the business logic for:
//! - Listing pagination (`Paginator`)
//! - Detail page availability checks (`AvailabilityResolver`)
//! - Course selection (`CourseFilter`)
//! - Message rendering (`NotificationComposer`)
//! - Queue hand-off (`Publisher`)

mod availability;
mod composer;
mod filter;
mod paginator;
mod publisher;

pub use availability::AvailabilityResolver;
pub use composer::NotificationComposer;
pub use filter::CourseFilter;
pub use paginator::Paginator;
pub use publisher::Publisher;
