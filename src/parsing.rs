//! Tolerant readers for Last.fm's loosely shaped JSON.
//!
//! The API is inconsistent: display names arrive as `name`, `#text` or
//! `title` depending on the endpoint, numbers are often encoded as strings,
//! booleans as `"0"`/`"1"`, and a list with a single element may be flattened
//! into a bare object. These helpers absorb that variance in one place.

use crate::{LastFmError, Result};
use serde_json::Value;

/// Read a required string field.
pub(crate) fn required_str(data: &Value, key: &str) -> Result<String> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| LastFmError::Parse(format!("missing field `{key}`")))
}

/// Read an optional string field; empty strings count as absent.
pub(crate) fn optional_str(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Read a numeric field that may arrive as a number or a numeric string.
/// Missing or malformed values read as zero.
pub(crate) fn count(data: &Value, key: &str) -> u64 {
    match data.get(key) {
        Some(Value::Number(number)) => number.as_u64().unwrap_or(0),
        Some(Value::String(text)) => text.parse().unwrap_or(0),
        _ => 0,
    }
}

/// Read a boolean flag that may arrive as `"0"`/`"1"` or a real boolean.
pub(crate) fn flag(data: &Value, key: &str) -> bool {
    match data.get(key) {
        Some(Value::String(text)) => text == "1",
        Some(Value::Bool(value)) => *value,
        _ => false,
    }
}

/// Display name of an object: embedded references use `#text`, info payloads
/// `name`, album charts `title`.
pub(crate) fn name(data: &Value) -> Result<String> {
    for key in ["#text", "name", "title"] {
        if let Some(value) = data.get(key).and_then(Value::as_str) {
            return Ok(value.to_string());
        }
    }
    Err(LastFmError::Parse("object has no name".to_string()))
}

/// Read a reference that may be a bare string (search results) or an embedded
/// object with its own name (info payloads).
pub(crate) fn string_or_name(data: &Value, key: &str) -> Option<String> {
    match data.get(key) {
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        Some(object @ Value::Object(_)) => name(object).ok(),
        _ => None,
    }
}

/// Read `data[key]` as a list of objects. A bare object is treated as a
/// one-element list, anything else as empty.
pub(crate) fn list<'a>(data: &'a Value, key: &str) -> Vec<&'a Value> {
    match data.get(key) {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(item @ Value::Object(_)) => vec![item],
        _ => Vec::new(),
    }
}

/// Read `data[outer][inner]` as a list, tolerating missing levels.
pub(crate) fn nested_list<'a>(data: &'a Value, outer: &str, inner: &str) -> Vec<&'a Value> {
    match data.get(outer) {
        Some(node) => list(node, inner),
        None => Vec::new(),
    }
}

/// Walk `path` and read the final key as a list, tolerating missing levels.
pub(crate) fn list_at<'a>(data: &'a Value, path: &[&str]) -> Vec<&'a Value> {
    let Some((last, parents)) = path.split_last() else {
        return Vec::new();
    };
    let mut node = data;
    for key in parents {
        match node.get(key) {
            Some(next) => node = next,
            None => return Vec::new(),
        }
    }
    list(node, last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counts_accept_numbers_and_strings() {
        let data = json!({ "listeners": "1234", "playcount": 99, "reach": "oops" });
        assert_eq!(count(&data, "listeners"), 1234);
        assert_eq!(count(&data, "playcount"), 99);
        assert_eq!(count(&data, "reach"), 0);
        assert_eq!(count(&data, "absent"), 0);
    }

    #[test]
    fn names_come_from_any_of_the_known_keys() {
        assert_eq!(name(&json!({ "name": "Low" })).unwrap(), "Low");
        assert_eq!(name(&json!({ "#text": "Bowie" })).unwrap(), "Bowie");
        assert_eq!(name(&json!({ "title": "Heroes" })).unwrap(), "Heroes");
        assert!(name(&json!({ "url": "x" })).is_err());
    }

    #[test]
    fn single_objects_are_one_element_lists() {
        let flattened = json!({ "tracks": { "track": { "name": "Only One" } } });
        let items = nested_list(&flattened, "tracks", "track");
        assert_eq!(items.len(), 1);

        let listed = json!({ "tracks": { "track": [{ "name": "A" }, { "name": "B" }] } });
        assert_eq!(nested_list(&listed, "tracks", "track").len(), 2);

        assert!(nested_list(&json!({}), "tracks", "track").is_empty());
    }

    #[test]
    fn references_may_be_strings_or_objects() {
        assert_eq!(
            string_or_name(&json!({ "artist": "Can" }), "artist"),
            Some("Can".to_string())
        );
        assert_eq!(
            string_or_name(&json!({ "artist": { "name": "Can", "mbid": "" } }), "artist"),
            Some("Can".to_string())
        );
        assert_eq!(string_or_name(&json!({ "artist": "" }), "artist"), None);
        assert_eq!(string_or_name(&json!({}), "artist"), None);
    }

    #[test]
    fn empty_strings_are_absent() {
        let data = json!({ "mbid": "", "url": "https://last.fm/x" });
        assert_eq!(optional_str(&data, "mbid"), None);
        assert!(optional_str(&data, "url").is_some());
    }
}
