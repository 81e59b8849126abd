//! Parsing of the JSON-encoded mapping columns (genres, languages, countries).
//!
//! The genre column is read under two policies that disagree on what an
//! empty field means:
//!
//! * [`display_genres`] (frequency query) counts an empty or unreadable field
//!   as its own `"Unknown"` category.
//! * [`match_genres`] (release filter, random movie) returns no genres at all,
//!   so the movie never matches a named genre.
//!
//! The inconsistency is kept for compatibility with existing result sets.

use serde_json::Value as JsonValue;

/// Placeholder category used by [`display_genres`].
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Genre names for the frequency query. Never empty.
pub fn display_genres(field: Option<&str>) -> Vec<String> {
    match mapping_values(field) {
        Some(values) if !values.is_empty() => values,
        _ => vec![UNKNOWN_GENRE.to_string()],
    }
}

/// Genre names for matching. Empty when the field is empty or unreadable.
pub fn match_genres(field: Option<&str>) -> Vec<String> {
    mapping_values(field).unwrap_or_default()
}

/// Values of a JSON object in field order, or `None` when the text is blank,
/// `{}`, not JSON, or not an object. Non-string values are rendered as JSON.
pub fn mapping_values(field: Option<&str>) -> Option<Vec<String>> {
    let text = field?.trim();
    if text.is_empty() || text == "{}" {
        return None;
    }
    match serde_json::from_str::<JsonValue>(text) {
        Ok(JsonValue::Object(map)) => Some(
            map.into_iter()
                .map(|(_, v)| match v {
                    JsonValue::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
        ),
        _ => None,
    }
}
