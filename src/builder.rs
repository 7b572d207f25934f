//! Assembling aggregate requests.
//!
//! A request reaches the client either as a typed [`AggregateRequest`]
//! (usually built with [`RequestBuilder`]) or as a generic JSON mapping with
//! snake_case keys. Both are resolved into a [`RequestBody`] at the boundary.
//!
//! Acceptance here is structural only: a mapping missing `requests` or a part
//! missing `part_id` is passed on, and the gateway reports the problem.

use crate::model::{AggregateRequest, PartParam, PartRequest, RequestMeta};
use crate::{Error, Result};
use serde_json::{Map, Value};

/// Fluent construction of an [`AggregateRequest`].
///
/// # Examples
///
/// ```
/// use octoparts::{AggregateRequest, PartRequest, RequestMeta};
///
/// let request = AggregateRequest::builder()
///     .request_meta(RequestMeta::new().id("test").timeout(500))
///     .part_request(PartRequest::new("echo"))
///     .add_param("fooValue", "test")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.requests[0].params[0].value, "test");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    request_meta: RequestMeta,
    requests: Vec<PartRequest>,
    orphan_param: Option<PartParam>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_meta(mut self, meta: RequestMeta) -> Self {
        self.request_meta = meta;
        self
    }

    /// Appends a part request.
    pub fn part_request(mut self, request: PartRequest) -> Self {
        self.requests.push(request);
        self
    }

    /// Appends several part requests, in order.
    pub fn part_requests(mut self, requests: impl IntoIterator<Item = PartRequest>) -> Self {
        self.requests.extend(requests);
        self
    }

    /// Appends a parameter to the most recently appended part request.
    ///
    /// Calling this before any part request makes [`build`](Self::build) fail.
    pub fn add_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let param = PartParam::new(key, value);
        match self.requests.last_mut() {
            Some(last) => last.params.push(param),
            None => {
                if self.orphan_param.is_none() {
                    self.orphan_param = Some(param);
                }
            }
        }
        self
    }

    /// Finishes the request.
    ///
    /// Only the shape is checked here. An empty `requests` list or an empty
    /// `part_id` builds fine and is judged by the gateway, exactly like the
    /// same request given as a mapping; a rejection comes back as
    /// [`Error::Client`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if a parameter was added before any part request.
    pub fn build(self) -> Result<AggregateRequest> {
        if let Some(param) = self.orphan_param {
            return Err(Error::Argument(format!(
                "parameter {:?} added before any part request",
                param.key
            )));
        }
        Ok(AggregateRequest {
            request_meta: self.request_meta,
            requests: self.requests,
        })
    }
}

/// A request resolved at the client boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// A generic mapping with snake_case (or already camelCase) keys.
    Mapping(Map<String, Value>),
    /// A typed request model.
    Model(AggregateRequest),
}

impl RequestBody {
    /// Resolves a generic JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] for `null` or for anything other than an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(RequestBody::Mapping(map)),
            Value::Null => Err(Error::Argument("request must not be null".to_string())),
            other => Err(Error::Argument(format!(
                "request must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Anything the client can invoke with.
///
/// Implemented for typed requests, JSON values and maps, and `Option`s of
/// those (`None` is an argument error).
pub trait IntoRequestBody {
    fn into_request_body(self) -> Result<RequestBody>;
}

impl IntoRequestBody for RequestBody {
    fn into_request_body(self) -> Result<RequestBody> {
        Ok(self)
    }
}

impl IntoRequestBody for AggregateRequest {
    fn into_request_body(self) -> Result<RequestBody> {
        Ok(RequestBody::Model(self))
    }
}

impl IntoRequestBody for &AggregateRequest {
    fn into_request_body(self) -> Result<RequestBody> {
        Ok(RequestBody::Model(self.clone()))
    }
}

impl IntoRequestBody for Value {
    fn into_request_body(self) -> Result<RequestBody> {
        RequestBody::from_value(self)
    }
}

impl IntoRequestBody for Map<String, Value> {
    fn into_request_body(self) -> Result<RequestBody> {
        Ok(RequestBody::Mapping(self))
    }
}

impl<T: IntoRequestBody> IntoRequestBody for Option<T> {
    fn into_request_body(self) -> Result<RequestBody> {
        match self {
            Some(inner) => inner.into_request_body(),
            None => Err(Error::Argument("request must not be null".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde_json::json;

    #[test]
    fn params_attach_to_the_latest_part() {
        let request = RequestBuilder::new()
            .part_request(PartRequest::new("first"))
            .add_param("a", "1")
            .part_request(PartRequest::new("second").id("corr"))
            .add_param("b", "2")
            .add_param("c", "3")
            .build()
            .unwrap();

        assert_eq!(request.requests[0].params, vec![PartParam::new("a", "1")]);
        let keys: Vec<&str> = request.requests[1].params.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, ["b", "c"]);
        assert_eq!(request.requests[1].id.as_deref(), Some("corr"));
    }

    #[test]
    fn param_without_part_is_rejected() {
        let err = RequestBuilder::new().add_param("a", "1").build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    #[test]
    fn empty_builder_is_structurally_valid() {
        let request = RequestBuilder::new().build().unwrap();
        assert!(request.requests.is_empty());

        let request = RequestBuilder::new()
            .part_request(PartRequest::new(""))
            .build()
            .unwrap();
        assert_eq!(request.requests[0].part_id, "");
    }

    #[test]
    fn null_and_non_objects_are_argument_errors() {
        assert_eq!(Value::Null.into_request_body().unwrap_err().kind(), ErrorKind::Argument);
        assert_eq!(json!([1, 2]).into_request_body().unwrap_err().kind(), ErrorKind::Argument);
        assert_eq!(json!("x").into_request_body().unwrap_err().kind(), ErrorKind::Argument);
        assert_eq!(
            None::<AggregateRequest>.into_request_body().unwrap_err().kind(),
            ErrorKind::Argument
        );
    }

    #[test]
    fn incomplete_mapping_is_accepted() {
        let body = json!({"request_meta": {"timeout": 500}}).into_request_body().unwrap();
        assert!(matches!(body, RequestBody::Mapping(_)));
    }
}
