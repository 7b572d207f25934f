//! Encoding requests to and decoding responses from the gateway's JSON.

use crate::builder::RequestBody;
use crate::casing::to_camel;
use crate::model::AggregateResponse;
use crate::{Error, Result};
use serde_json::Value;

/// Converts a request into the camelCase JSON value sent on the wire.
pub fn to_wire_value(body: RequestBody) -> Result<Value> {
    let snake = match body {
        RequestBody::Mapping(map) => Value::Object(map),
        RequestBody::Model(request) => {
            serde_json::to_value(request).map_err(|e| Error::Serialization(e.to_string()))?
        }
    };
    Ok(to_camel(snake))
}

/// Serializes a request into compact wire JSON.
///
/// Key order follows the source: field order for typed requests, insertion
/// order for mappings.
///
/// # Examples
///
/// ```
/// use octoparts::wire::serialize;
/// use octoparts::IntoRequestBody;
/// use serde_json::json;
///
/// let body = json!({
///     "request_meta": {"id": "test", "timeout": 500},
///     "requests": [{"part_id": "echo", "params": [{"key": "fooValue", "value": "test"}]}]
/// })
/// .into_request_body()
/// .unwrap();
///
/// assert_eq!(
///     serialize(body).unwrap(),
///     r#"{"requestMeta":{"id":"test","timeout":500},"requests":[{"partId":"echo","params":[{"key":"fooValue","value":"test"}]}]}"#
/// );
/// ```
pub fn serialize(body: RequestBody) -> Result<String> {
    let value = to_wire_value(body)?;
    serde_json::to_string(&value).map_err(|e| Error::Serialization(e.to_string()))
}

/// Parses a gateway response body.
///
/// The order of `responses` is kept exactly as received.
///
/// # Errors
///
/// Returns [`Error::Parse`] with the raw body and no status when the body is
/// not a valid aggregate response.
///
/// # Examples
///
/// ```
/// use octoparts::{wire::parse, ErrorKind};
///
/// let err = parse("not json").unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Parse);
/// assert_eq!(err.raw_response(), Some("not json"));
/// assert_eq!(err.status(), None);
/// ```
pub fn parse(body: &str) -> Result<AggregateResponse> {
    serde_json::from_str(body).map_err(|e| Error::Parse {
        status: None,
        raw_response: body.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AggregateRequest, PartRequest, RequestMeta};
    use crate::IntoRequestBody;
    use serde_json::json;

    const ECHO_WIRE: &str = r#"{"requestMeta":{"id":"test","timeout":500},"requests":[{"partId":"echo","params":[{"key":"fooValue","value":"test"}]}]}"#;

    #[test]
    fn builder_request_serializes_to_exact_wire_form() {
        let request = AggregateRequest::builder()
            .request_meta(RequestMeta::new().id("test").timeout(500))
            .part_request(PartRequest::new("echo").add_param("fooValue", "test"))
            .build()
            .unwrap();
        assert_eq!(serialize(request.into_request_body().unwrap()).unwrap(), ECHO_WIRE);
    }

    #[test]
    fn mapping_serializes_to_exact_wire_form() {
        let body = json!({
            "request_meta": {"id": "test", "timeout": 500},
            "requests": [{"part_id": "echo", "params": [{"key": "fooValue", "value": "test"}]}]
        });
        assert_eq!(serialize(body.into_request_body().unwrap()).unwrap(), ECHO_WIRE);
    }

    #[test]
    fn every_meta_field_is_camelized() {
        let body = json!({
            "request_meta": {
                "id": 1,
                "service_id": "hoge",
                "user_id": 2,
                "session_id": 3,
                "request_url": "http://test.com",
                "user_agent": "rust",
                "timeout": 4
            },
            "requests": [{
                "part_id": "fuga",
                "id": 5,
                "params": [{"key": "value_of_key", "value": "value_of_value"}]
            }]
        });
        let wire: Value =
            serde_json::from_str(&serialize(body.into_request_body().unwrap()).unwrap()).unwrap();

        let meta = &wire["requestMeta"];
        assert_eq!(meta["id"], 1);
        assert_eq!(meta["serviceId"], "hoge");
        assert_eq!(meta["userId"], 2);
        assert_eq!(meta["sessionId"], 3);
        assert_eq!(meta["requestUrl"], "http://test.com");
        assert_eq!(meta["userAgent"], "rust");
        assert_eq!(meta["timeout"], 4);

        let item = &wire["requests"][0];
        assert_eq!(item["partId"], "fuga");
        assert_eq!(item["id"], 5);
        assert_eq!(item["params"][0]["key"], "value_of_key");
        assert_eq!(item["params"][0]["value"], "value_of_value");
    }

    #[test]
    fn typed_meta_keeps_field_order() {
        let request = AggregateRequest::builder()
            .request_meta(
                RequestMeta::new()
                    .id("r1")
                    .service_id("svc")
                    .user_id("u")
                    .session_id("s")
                    .request_url("http://test.com")
                    .user_agent("rust")
                    .timeout(10),
            )
            .part_request(PartRequest::new("echo").id("c1"))
            .build()
            .unwrap();
        assert_eq!(
            serialize(request.into_request_body().unwrap()).unwrap(),
            r#"{"requestMeta":{"id":"r1","serviceId":"svc","userId":"u","sessionId":"s","requestUrl":"http://test.com","userAgent":"rust","timeout":10},"requests":[{"partId":"echo","id":"c1","params":[]}]}"#
        );
    }

    #[test]
    fn parse_preserves_response_order() {
        let response = parse(
            r#"{"responseMeta":{"id":"test"},"responses":[
                {"partId":"echo","contents":"{\"fooValue\":\"test\"}"},
                {"partId":"echo","contents":"{\"fooValue\":\"hoge\"}"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(response.responses.len(), 2);
        assert!(response.responses[0].contents.as_deref().unwrap().contains("\"test\""));
        assert!(response.responses[1].contents.as_deref().unwrap().contains("\"hoge\""));
    }

    #[test]
    fn parse_tolerates_missing_meta_and_empty_responses() {
        let response = parse(r#"{"responses":[]}"#).unwrap();
        assert!(response.responses.is_empty());
        assert_eq!(response.response_meta, Default::default());

        let response = parse("{}").unwrap();
        assert!(response.responses.is_empty());
    }

    #[test]
    fn parse_rejects_malformed_bodies() {
        for body in [
            "not json",
            r#"{"responses":{"partId":"echo"}}"#,
            r#"{"responses":[{"contents":"x"}]}"#,
        ] {
            match parse(body) {
                Err(Error::Parse {
                    status,
                    raw_response,
                    ..
                }) => {
                    assert_eq!(status, None);
                    assert_eq!(raw_response, body);
                }
                other => panic!("expected Error::Parse for {body}, got {other:?}"),
            }
        }
    }
}
