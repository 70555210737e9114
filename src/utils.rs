use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Timestamp format used both in output directory names and log records.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Longest sanitized URL stem kept in a directory name.
const MAX_STEM_LEN: usize = 100;

/// Derive a filesystem-safe directory stem from a target URL.
///
/// Deterministic: strips the scheme, replaces path separators and other
/// reserved characters with `_`, bounds the length, and appends a short
/// hash of the full URL so two distinct URLs captured in the same run can
/// never map to the same directory.
pub fn sanitize_url(url: &str) -> String {
    let without_scheme = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url,
    };

    let mut stem: String = without_scheme
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '?' | '&' | '=' | '#' | '*' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() || c.is_whitespace() => '_',
            c => c,
        })
        .collect();

    if stem.len() > MAX_STEM_LEN {
        let mut cut = MAX_STEM_LEN;
        while !stem.is_char_boundary(cut) {
            cut -= 1;
        }
        stem.truncate(cut);
    }

    format!("{stem}-{}", short_url_hash(url))
}

/// Eight hex digits derived from the full URL, stable for the process
/// lifetime.
pub fn short_url_hash(url: &str) -> String {
    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    format!("{:08x}", hasher.finish() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_url_strips_scheme() {
        let sanitized = sanitize_url("https://example.com/path");
        assert!(sanitized.starts_with("example.com_path-"));
        assert!(!sanitized.contains("https"));
    }

    #[test]
    fn test_sanitize_url_deterministic() {
        assert_eq!(
            sanitize_url("https://example.com/a?b=c"),
            sanitize_url("https://example.com/a?b=c")
        );
    }

    #[test]
    fn test_sanitize_url_distinct_for_distinct_urls() {
        assert_ne!(
            sanitize_url("https://example.com/a/b"),
            sanitize_url("https://example.com/a:b")
        );
        assert_ne!(
            sanitize_url("https://example.com"),
            sanitize_url("http://example.com")
        );
    }

    #[test]
    fn test_sanitize_url_bounds_length() {
        let long = format!("https://example.com/{}", "x".repeat(500));
        let sanitized = sanitize_url(&long);
        assert!(sanitized.len() <= MAX_STEM_LEN + 9);
    }

    #[test]
    fn test_sanitize_url_replaces_reserved_characters() {
        let sanitized = sanitize_url("https://example.com:8080/a/b?q=1&r=2");
        let stem = sanitized.rsplit_once('-').map(|(s, _)| s).unwrap();
        assert_eq!(stem, "example.com_8080_a_b_q_1_r_2");
    }
}
