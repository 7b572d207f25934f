//! snake_case to camelCase key rewriting for outgoing JSON documents.
//!
//! Only mapping keys are touched. String values, numbers, booleans and nulls
//! are leaves and pass through as-is. Entry order is preserved, which keeps
//! the serialized output byte-for-byte deterministic.

use serde_json::{Map, Value};
use std::borrow::Cow;

/// Recursively rewrites every object key in `value` from snake_case to camelCase.
///
/// # Examples
///
/// ```
/// use octoparts::casing::to_camel;
/// use serde_json::json;
///
/// let value = to_camel(json!({"request_meta": {"user_id": "u1"}, "requests": []}));
/// assert_eq!(value, json!({"requestMeta": {"userId": "u1"}, "requests": []}));
/// ```
pub fn to_camel(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut camelized = Map::with_capacity(map.len());
            for (key, value) in map {
                camelized.insert(camelize_key(&key).into_owned(), to_camel(value));
            }
            Value::Object(camelized)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(to_camel).collect()),
        leaf => leaf,
    }
}

/// Converts a single snake_case key to camelCase.
///
/// Keys that are not made of lowercase/digit segments joined by underscores
/// (already camelCase, empty, leading or doubled underscores) are returned unchanged.
pub fn camelize_key(key: &str) -> Cow<'_, str> {
    if !key.contains('_') || !is_snake_case(key) {
        return Cow::Borrowed(key);
    }

    let mut out = String::with_capacity(key.len());
    for (i, segment) in key.split('_').enumerate() {
        if i == 0 {
            out.push_str(segment);
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    Cow::Owned(out)
}

fn is_snake_case(key: &str) -> bool {
    key.split('_').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    })
}
