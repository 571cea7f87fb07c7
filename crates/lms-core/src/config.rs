//! Environment-variable helpers for service configuration.
//!
//! Services build their config struct field by field from these at startup.

use std::str::FromStr;

/// Read a required variable.
///
/// # Panics
///
/// Panics with the variable name if it is unset.
pub fn required(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| panic!("{key} must be set"))
}

/// Read an optional variable; empty values count as unset.
pub fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Read and parse a variable, falling back to `default` when unset or unparseable.
pub fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    optional(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Split a comma-separated variable, falling back to `default` when unset.
pub fn list_or(key: &str, default: &[&str]) -> Vec<String> {
    match optional(key) {
        Some(v) => v
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
        None => default.iter().map(|s| (*s).to_owned()).collect(),
    }
}
