// src/utils/url.rs

//! URL manipulation utilities.

/// Join a site-relative path onto a base URL.
///
/// Absolute `href`s are returned unchanged; otherwise the path is appended
/// to the base with exactly one `/` between them.
///
/// # Examples
/// ```
/// use court_notifier::utils::url::join;
///
/// assert_eq!(
///     join("https://example.com/", "/Coaching/Course/7"),
///     "https://example.com/Coaching/Course/7"
/// );
/// ```
pub fn join(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    if href.is_empty() {
        return base.to_string();
    }

    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        href.trim_start_matches('/')
    )
}

/// Append a single query parameter, respecting an existing query string.
pub fn with_query(url: &str, key: &str, value: impl std::fmt::Display) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{key}={value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_absolute_url() {
        assert_eq!(
            join("https://example.com", "https://other.com/page"),
            "https://other.com/page"
        );
    }

    #[test]
    fn test_join_absolute_path() {
        assert_eq!(
            join("https://example.com", "/Coaching/Adult"),
            "https://example.com/Coaching/Adult"
        );
    }

    #[test]
    fn test_join_keeps_base_path() {
        assert_eq!(
            join("https://example.com/tennis/", "Coaching/Adult"),
            "https://example.com/tennis/Coaching/Adult"
        );
    }

    #[test]
    fn test_with_query() {
        assert_eq!(
            with_query("https://example.com/Coaching/Adult", "startPosition", 0),
            "https://example.com/Coaching/Adult?startPosition=0"
        );
        assert_eq!(
            with_query("https://example.com/list?type=adult", "startPosition", 20),
            "https://example.com/list?type=adult&startPosition=20"
        );
    }
}
