//! The typed result tree returned by the gateway.
//!
//! Parsing is lenient about optional data: a missing or `null` `responseMeta`,
//! `errors`, `warnings` or `cacheControl` decodes to its empty value. A
//! part-response without a `partId`, or a `responses` value that is not an
//! array, is rejected.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The full result of an aggregate call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub response_meta: ResponseMeta,
    /// Part responses, in the order the gateway sent them.
    #[serde(default, deserialize_with = "null_as_default")]
    pub responses: Vec<PartResponse>,
}

impl AggregateResponse {
    /// Returns the first response for `part_id`.
    pub fn find(&self, part_id: &str) -> Option<&PartResponse> {
        self.responses.iter().find(|r| r.part_id == part_id)
    }

    /// Returns the response whose correlation id is `id`.
    pub fn find_by_id(&self, id: &str) -> Option<&PartResponse> {
        self.responses.iter().find(|r| r.id.as_deref() == Some(id))
    }
}

/// Metadata about the aggregate call, echoed and added by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub id: Option<String>,
    /// Server-side processing time in milliseconds.
    #[serde(default)]
    pub process_time: Option<u64>,
    /// Every other metadata key, as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The result of one part.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartResponse {
    pub part_id: String,
    /// Echo of the request's correlation id.
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub id: Option<String>,
    /// Raw payload of the backend part; opaque to this crate.
    #[serde(default)]
    pub contents: Option<String>,
    /// The part's own status, distinct from the HTTP status of the call.
    #[serde(default)]
    pub status_code: Option<i32>,
    #[serde(default)]
    pub status_name: Option<String>,
    #[serde(default, deserialize_with = "messages")]
    pub errors: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "messages")]
    pub warnings: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cache_control: CacheControl,
    #[serde(default, deserialize_with = "null_as_default")]
    pub retrieved_from_cache: bool,
}

impl PartResponse {
    /// `true` when the part reported no errors and its status code is absent or 2xx.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && self.status_code.is_none_or(|c| (200..300).contains(&c))
    }
}

/// Cache state of a part response. Both timestamps absent means the response
/// was not cache-eligible or was a miss.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheControl {
    #[serde(default, deserialize_with = "timestamp")]
    pub cached_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub cache_expiry: Option<DateTime<Utc>>,
}

impl CacheControl {
    pub fn is_cached(&self) -> bool {
        self.cached_at.is_some()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a string or a number; ids may be either on the wire.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string or number id, got {other}"
        ))),
    }
}

/// Accepts an object of string messages or an array of messages keyed by index.
fn messages<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    fn message_text(value: Value) -> String {
        match value {
            Value::String(s) => s,
            other => other.to_string(),
        }
    }

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(Value::Object(map)) => Ok(map
            .into_iter()
            .map(|(key, value)| (key, message_text(value)))
            .collect()),
        Some(Value::Array(items)) => Ok(items
            .into_iter()
            .enumerate()
            .map(|(i, value)| (i.to_string(), message_text(value)))
            .collect()),
        Some(other) => Err(de::Error::custom(format!(
            "expected an object or array of messages, got {other}"
        ))),
    }
}

/// Accepts epoch milliseconds or an RFC 3339 string.
fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            let millis = n
                .as_i64()
                .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {n}")))?;
            Utc.timestamp_millis_opt(millis)
                .single()
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {millis}")))
        }
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|e| de::Error::custom(format!("invalid timestamp {s:?}: {e}"))),
        Some(other) => Err(de::Error::custom(format!(
            "expected a timestamp, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn part(value: Value) -> Result<PartResponse, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let p = part(json!({"partId": "echo"})).unwrap();
        assert_eq!(p.part_id, "echo");
        assert!(p.errors.is_empty());
        assert!(p.warnings.is_empty());
        assert_eq!(p.cache_control, CacheControl::default());
        assert!(!p.cache_control.is_cached());
        assert!(!p.retrieved_from_cache);
        assert!(p.is_success());
    }

    #[test]
    fn null_cache_control_is_an_empty_value() {
        let p = part(json!({"partId": "echo", "cacheControl": null})).unwrap();
        assert_eq!(p.cache_control.cached_at, None);
        assert_eq!(p.cache_control.cache_expiry, None);
    }

    #[test]
    fn part_id_is_required() {
        assert!(part(json!({"contents": "x"})).is_err());
    }

    #[test]
    fn numeric_ids_are_stringified() {
        let p = part(json!({"partId": "echo", "id": 5})).unwrap();
        assert_eq!(p.id.as_deref(), Some("5"));
    }

    #[test]
    fn messages_accept_objects_and_arrays() {
        let p = part(json!({
            "partId": "echo",
            "errors": {"fooValue": "missing"},
            "warnings": ["slow", "stale"]
        }))
        .unwrap();
        assert_eq!(p.errors.get("fooValue").map(String::as_str), Some("missing"));
        assert_eq!(p.warnings.get("0").map(String::as_str), Some("slow"));
        assert_eq!(p.warnings.get("1").map(String::as_str), Some("stale"));
        assert!(!p.is_success());
    }

    #[test]
    fn timestamps_accept_millis_and_rfc3339() {
        let p = part(json!({
            "partId": "echo",
            "cacheControl": {"cachedAt": 1_400_000_000_000i64, "cacheExpiry": "2014-05-13T16:53:20Z"}
        }))
        .unwrap();
        let cached_at = p.cache_control.cached_at.unwrap();
        assert_eq!(cached_at.timestamp_millis(), 1_400_000_000_000);
        assert_eq!(p.cache_control.cache_expiry.unwrap().timestamp(), 1_400_000_000);
        assert!(p.cache_control.is_cached());
    }

    #[test]
    fn invalid_timestamp_is_rejected() {
        assert!(part(json!({"partId": "echo", "cacheControl": {"cachedAt": "yesterday"}})).is_err());
    }

    #[test]
    fn non_2xx_part_status_is_not_success() {
        let p = part(json!({"partId": "echo", "statusCode": 503})).unwrap();
        assert!(!p.is_success());
    }

    #[test]
    fn response_meta_keeps_unknown_keys() {
        let meta: ResponseMeta =
            serde_json::from_value(json!({"id": "test", "processTime": 12, "node": "a"})).unwrap();
        assert_eq!(meta.id.as_deref(), Some("test"));
        assert_eq!(meta.process_time, Some(12));
        assert_eq!(meta.extra.get("node"), Some(&json!("a")));
    }

    #[test]
    fn lookups_by_part_and_correlation_id() {
        let response: AggregateResponse = serde_json::from_value(json!({
            "responses": [
                {"partId": "echo", "id": "first"},
                {"partId": "echo", "id": "second"},
                {"partId": "other"}
            ]
        }))
        .unwrap();
        assert_eq!(response.find("echo").and_then(|r| r.id.as_deref()), Some("first"));
        assert_eq!(response.find_by_id("second").map(|r| r.part_id.as_str()), Some("echo"));
        assert!(response.find("missing").is_none());
    }
}
