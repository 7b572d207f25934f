//! The pluggable HTTP transport underneath the client.
//!
//! The client hands a fully built [`HttpRequest`] to a [`Transport`] and gets
//! back either the raw [`HttpResponse`] (any status) or a [`TransportError`].
//! Connection pooling, TLS and deadlines are the transport's business.

use crate::error::BoxError;
use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use std::time::Duration;
use url::Url;

/// An outbound request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, crate::Error> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| crate::Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| crate::Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// Why a transport could not produce a response.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    /// The connect or read deadline elapsed.
    #[error("timed out: {0}")]
    Timeout(#[source] BoxError),

    /// Any other failure to complete the exchange.
    #[error("network failure: {0}")]
    Network(#[source] BoxError),
}

/// Sends one request and returns the server's answer.
///
/// Implementations must not retry; each call is exactly one exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// The default transport, backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with independent connect (`open_timeout`) and read
    /// (`timeout`) deadlines. `None` means no deadline.
    ///
    /// The read deadline bounds each wait for response bytes, starting once
    /// the request is dispatched; it does not include connection setup, so a
    /// slow connect is limited by `open_timeout` alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`](crate::Error::Configuration) if the
    /// underlying client cannot be built.
    pub fn new(
        open_timeout: Option<Duration>,
        timeout: Option<Duration>,
    ) -> Result<Self, crate::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("octoparts-rust/", env!("CARGO_PKG_VERSION")));
        if let Some(open_timeout) = open_timeout {
            builder = builder.connect_timeout(open_timeout);
        }
        if let Some(timeout) = timeout {
            builder = builder.read_timeout(timeout);
        }
        let http_client = builder.build().map_err(|e| {
            crate::Error::Configuration(format!("Failed to build HTTP client: {}", e))
        })?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .http_client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(from_reqwest)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(from_reqwest)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Maps a reqwest failure onto the two transport outcomes.
///
/// reqwest reports an elapsed `connect_timeout` as a connect error whose
/// source chain ends in its `TimedOut` marker, and `is_timeout()` walks that
/// chain, so connect and read deadlines both land in `Timeout`. Refused or
/// reset connections and DNS failures have no such marker and become `Network`.
fn from_reqwest(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(Box::new(error))
    } else {
        TransportError::Network(Box::new(error))
    }
}
