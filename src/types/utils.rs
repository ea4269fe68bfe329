//! Shared utility functions for type serialization and common operations.

use std::fmt::Display;

// =============================================================================
// Type Parsing
// =============================================================================

/// Trait for parsing strings into enum types with a default fallback.
/// Used for deserializing database values where invalid strings should fall back gracefully.
/// Logs a warning when an invalid value is encountered.
pub trait ParseWithDefault: Sized {
    /// The name of this type for logging purposes.
    fn type_name() -> &'static str;

    /// The default value to use when parsing fails.
    fn default_value() -> Self;

    /// Try to parse the string, returning None if invalid.
    fn try_parse(s: &str) -> Option<Self>;

    /// Parse a string into this type, returning a default value if parsing fails.
    fn parse_or_default(s: &str) -> Self {
        match Self::try_parse(s) {
            Some(v) => v,
            None => {
                tracing::warn!("Invalid {} value '{}', using default", Self::type_name(), s);
                Self::default_value()
            }
        }
    }
}

/// Filter an iterator of Results, logging errors at debug level before discarding.
///
/// Use this instead of `.filter_map(|r| r.ok())` when you want visibility into
/// what errors are being discarded.
///
/// # Example
/// ```ignore
/// let values: Vec<_> = results
///     .filter_map(|r| log_filter_error(r, "loading items"))
///     .collect();
/// ```
pub fn log_filter_error<T, E: Display>(result: Result<T, E>, context: &str) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!("{}: {}", context, e);
            None
        }
    }
}

// =============================================================================
// String Utilities
// =============================================================================

/// Shorten text for log lines, on a char boundary
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_error_discards() {
        let results: Vec<Result<i32, String>> = vec![Ok(1), Err("bad".into()), Ok(3)];
        let kept: Vec<_> = results
            .into_iter()
            .filter_map(|r| log_filter_error(r, "test"))
            .collect();
        assert_eq!(kept, vec![1, 3]);
    }

    #[test]
    fn test_preview_multibyte() {
        assert_eq!(preview("안녕하세요", 2), "안녕...");
        assert_eq!(preview("short", 10), "short");
    }
}
