//! Course selection rules.

use crate::models::{Course, ResolvedCourses};

/// Category exclusion before resolution, availability selection after it.
pub struct CourseFilter {
    exclusion_marker: String,
}

impl CourseFilter {
    pub fn new(exclusion_marker: impl Into<String>) -> Self {
        Self {
            exclusion_marker: exclusion_marker.into(),
        }
    }

    /// Drop courses whose title contains the exclusion marker, when enabled.
    pub fn exclude_by_category(&self, courses: Vec<Course>, exclude: bool) -> Vec<Course> {
        if !exclude || self.exclusion_marker.is_empty() {
            return courses;
        }

        courses
            .into_iter()
            .filter(|course| {
                let excluded = course.title.contains(&self.exclusion_marker);
                if excluded {
                    log::debug!("Skipping excluded course: {}", course.title);
                }
                !excluded
            })
            .collect()
    }

    /// Keep only courses with open spaces.
    pub fn select_available(&self, courses: ResolvedCourses) -> Vec<Course> {
        courses
            .into_inner()
            .into_iter()
            .filter(|course| course.available)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(title: &str, available: bool) -> Course {
        Course {
            title: title.to_string(),
            detail_path: format!("/c/{title}"),
            address: String::new(),
            date: String::new(),
            time: String::new(),
            price: String::new(),
            available,
        }
    }

    fn titles(courses: &[Course]) -> Vec<&str> {
        courses.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn excludes_marker_titles_when_enabled() {
        let filter = CourseFilter::new("Ladies");
        let courses = vec![
            course("Adult Beginners", false),
            course("Ladies Morning Group", false),
            course("Adult Improvers", false),
        ];

        let kept = filter.exclude_by_category(courses.clone(), true);
        assert_eq!(titles(&kept), ["Adult Beginners", "Adult Improvers"]);

        let kept = filter.exclude_by_category(courses, false);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn exclusion_is_case_sensitive_substring() {
        let filter = CourseFilter::new("Ladies");
        let kept = filter.exclude_by_category(
            vec![course("ladies doubles", false), course("MixedLadiesPlus", false)],
            true,
        );
        assert_eq!(titles(&kept), ["ladies doubles"]);
    }

    #[test]
    fn selects_available_in_order() {
        let filter = CourseFilter::new("Ladies");
        let resolved = ResolvedCourses::new(vec![
            course("A", true),
            course("B", false),
            course("C", true),
        ]);

        let selected = filter.select_available(resolved);
        assert_eq!(titles(&selected), ["A", "C"]);
    }
}
