//! The request side of the aggregate protocol.
//!
//! Field names are snake_case here; the wire serializer camelizes them.
//! Optional fields are omitted from the output when unset.

use serde::Serialize;

/// Metadata describing the aggregate call as a whole.
///
/// The client imposes no required fields. The gateway may reject a request
/// without an `id`, which surfaces as [`Error::Client`](crate::Error::Client).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Gateway-side deadline, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl RequestMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn service_id(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn request_url(mut self, request_url: impl Into<String>) -> Self {
        self.request_url = Some(request_url.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(timeout_ms);
        self
    }
}

/// One key/value parameter passed to a part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartParam {
    pub key: String,
    pub value: String,
}

impl PartParam {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A request for a single backend part.
///
/// `id` lets the caller correlate responses when several requests target
/// the same `part_id`. Parameter order is kept as appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartRequest {
    pub part_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub params: Vec<PartParam>,
}

impl PartRequest {
    pub fn new(part_id: impl Into<String>) -> Self {
        Self {
            part_id: part_id.into(),
            id: None,
            params: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Appends a parameter after any existing ones.
    pub fn add_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(PartParam::new(key, value));
        self
    }
}

/// A batch of part requests sent in one call.
///
/// Build one with [`AggregateRequest::builder`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateRequest {
    pub request_meta: RequestMeta,
    pub requests: Vec<PartRequest>,
}

impl AggregateRequest {
    pub fn builder() -> crate::builder::RequestBuilder {
        crate::builder::RequestBuilder::new()
    }
}
