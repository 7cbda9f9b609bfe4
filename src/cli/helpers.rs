//! Shared helper functions for CLI output
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use serde_json::Value;

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need bounded width.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Flatten a JSON object into `(key, scalar)` pairs
///
/// Nested objects are joined with `_` (`amount_value`), `_links` is dropped
/// and arrays are skipped since they have no single-cell representation.
pub fn flatten_json(value: &Value) -> Vec<(String, Value)> {
    let mut flat = Vec::new();
    if let Value::Object(map) = value {
        flatten_into(map, "", &mut flat);
    }
    flat
}

fn flatten_into(map: &serde_json::Map<String, Value>, prefix: &str, out: &mut Vec<(String, Value)>) {
    for (key, value) in map {
        if key == "_links" {
            continue;
        }

        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}_{key}")
        };

        match value {
            Value::Object(inner) => flatten_into(inner, &full_key, out),
            Value::Array(_) => {}
            scalar => out.push((full_key, scalar.clone())),
        }
    }
}
