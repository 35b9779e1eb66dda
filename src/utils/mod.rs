//! Utility functions and helpers.

pub mod http;

/// Append `/` unless the value already ends with one.
pub fn ensure_trailing_slash(value: &str) -> String {
    if value.ends_with('/') {
        value.to_string()
    } else {
        format!("{value}/")
    }
}
