//! Course data structures.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::session::Record;

/// Field names produced by the listing extraction.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const DETAIL_PATH: &str = "url";
    pub const ADDRESS: &str = "address";
    pub const DATE: &str = "date";
    pub const TIME: &str = "time";
    pub const PRICE: &str = "price";
}

/// A single coaching course taken from the listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Course {
    /// Course title
    pub title: String,

    /// Detail page path, relative to the site root
    #[serde(rename = "url")]
    pub detail_path: String,

    /// Venue address
    pub address: String,

    /// Display date, as shown on the listing
    pub date: String,

    /// Display time range
    pub time: String,

    /// Display price
    pub price: String,

    /// Whether the detail page reports open spaces
    #[serde(default)]
    pub available: bool,
}

impl Course {
    /// Build a course from an extracted listing record.
    pub fn from_record(record: &Record) -> Result<Self> {
        let field = |name: &str| -> Result<String> {
            record.get(name).cloned().ok_or_else(|| {
                AppError::extraction("course record", format!("missing field '{name}'"))
            })
        };

        let title = field(fields::TITLE)?;
        if title.is_empty() {
            return Err(AppError::extraction("course record", "empty title"));
        }
        let detail_path = field(fields::DETAIL_PATH)?;
        if detail_path.is_empty() {
            return Err(AppError::extraction(
                format!("course '{title}'"),
                "empty detail link",
            ));
        }

        Ok(Self {
            title,
            detail_path,
            address: field(fields::ADDRESS)?,
            date: field(fields::DATE)?,
            time: field(fields::TIME)?,
            price: field(fields::PRICE)?,
            available: false,
        })
    }

    /// Format course for display using a template.
    ///
    /// Supported placeholders:
    /// - `{title}`, `{date}`, `{time}`, `{price}`, `{address}`, `{available}`
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{title}", &self.title)
            .replace("{date}", &self.date)
            .replace("{time}", &self.time)
            .replace("{price}", &self.price)
            .replace("{address}", &self.address)
            .replace("{available}", &self.available.to_string())
    }
}

/// Courses whose availability has been resolved against their detail pages.
///
/// Only [`AvailabilityResolver`](crate::services::AvailabilityResolver) builds
/// this, so every course inside carries an explicitly resolved flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedCourses(Vec<Course>);

impl ResolvedCourses {
    pub(crate) fn new(courses: Vec<Course>) -> Self {
        Self(courses)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Course> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Course> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_record() -> Record {
        record(&[
            ("title", "Adult Beginners"),
            ("url", "/Coaching/Course/12"),
            ("address", "Church Road"),
            ("date", "Sat 3 Nov"),
            ("time", "10:00 - 11:00"),
            ("price", "£90.00"),
        ])
    }

    #[test]
    fn from_record_maps_all_fields() {
        let course = Course::from_record(&full_record()).unwrap();
        assert_eq!(course.title, "Adult Beginners");
        assert_eq!(course.detail_path, "/Coaching/Course/12");
        assert_eq!(course.price, "£90.00");
        assert!(!course.available);
    }

    #[test]
    fn from_record_rejects_missing_field() {
        let mut rec = full_record();
        rec.remove("price");
        let err = Course::from_record(&rec).unwrap_err();
        assert!(matches!(err, AppError::Extraction { .. }));
    }

    #[test]
    fn from_record_rejects_empty_title() {
        let mut rec = full_record();
        rec.insert("title".into(), String::new());
        assert!(Course::from_record(&rec).is_err());
    }

    #[test]
    fn format_replaces_placeholders() {
        let course = Course::from_record(&full_record()).unwrap();
        assert_eq!(
            course.format("{title} on {date} ({time}), Availability: {available}"),
            "Adult Beginners on Sat 3 Nov (10:00 - 11:00), Availability: false"
        );
    }
}
