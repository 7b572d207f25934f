//! The Octoparts client.
//!
//! [`Client`] turns caller input into one HTTP exchange with the gateway and
//! returns either a parsed [`AggregateResponse`] or exactly one [`Error`].
//! Use [`ClientBuilder`] to configure endpoint, deadlines, headers or a
//! custom [`Transport`].

use crate::{
    builder::IntoRequestBody,
    classify::classify_response,
    config::Config,
    model::AggregateResponse,
    transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport},
    wire, Error, Response, Result,
};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

const API_ROOT: [&str; 2] = ["octoparts", "2"];

/// A client for the Octoparts aggregate gateway.
///
/// Cheap to clone; clones share the transport and its connection pool.
/// Every operation performs exactly one outbound request and never retries.
///
/// # Examples
///
/// ```no_run
/// use octoparts::Client;
/// use serde_json::json;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), octoparts::Error> {
/// let client = Client::builder()
///     .endpoint("http://localhost:9000")?
///     .timeout(Duration::from_secs(5))
///     .build()?;
///
/// let response = client
///     .invoke(json!({
///         "request_meta": {"id": "test", "timeout": 500},
///         "requests": [{"part_id": "echo", "params": [{"key": "fooValue", "value": "test"}]}]
///     }))
///     .await?;
/// println!("{:?}", response.responses[0].contents);
///
/// client.invalidate_cache("echo").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    endpoint: Url,
    default_headers: HeaderMap,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.inner.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client from the process-wide [`Config::global`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured endpoint is invalid or the HTTP
    /// client cannot be built.
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    /// Creates a new `ClientBuilder` starting from [`Config::global`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The gateway base URL.
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Invokes the aggregate endpoint (`POST /octoparts/2`).
    ///
    /// Accepts a typed [`AggregateRequest`](crate::AggregateRequest), a JSON
    /// object with snake_case keys, or an `Option` of either.
    ///
    /// # Errors
    ///
    /// - [`Error::Argument`] for `null`/`None` or non-object input, before any I/O
    /// - [`Error::Client`] / [`Error::Server`] for 4xx / other non-2xx answers
    /// - [`Error::Timeout`] / [`Error::Network`] for transport failures
    /// - [`Error::Parse`] when a 2xx body is not a valid aggregate response
    pub async fn invoke<B>(&self, body: B) -> Result<Response<AggregateResponse>>
    where
        B: IntoRequestBody,
    {
        let body = body.into_request_body()?;
        let payload = wire::serialize(body)?;

        let request = HttpRequest::new(Method::POST, self.url(API_ROOT)?)
            .with_header(CONTENT_TYPE, "application/json")?
            .with_body(payload);

        let start_time = Instant::now();
        let response = self.execute(request).await?;
        let latency = start_time.elapsed();

        match wire::parse(&response.body) {
            Ok(data) => Ok(Response::new(
                data,
                response.body,
                response.status,
                response.headers,
                latency,
            )),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    raw_response = %response.body,
                    "Failed to parse aggregate response"
                );

                Err(e.with_status(response.status))
            }
        }
    }

    /// Invalidates every cached response of a part
    /// (`POST /octoparts/2/cache/invalidate/part/{part_id}`).
    pub async fn invalidate_cache(&self, part_id: &str) -> Result<HttpResponse> {
        self.post_empty(&["cache", "invalidate", "part", part_id])
            .await
    }

    /// Invalidates the cached responses of a part for one parameter value
    /// (`POST /octoparts/2/cache/invalidate/part/{part_id}/{param_name}/{param_value}`).
    pub async fn invalidate_cache_param(
        &self,
        part_id: &str,
        param_name: &str,
        param_value: &str,
    ) -> Result<HttpResponse> {
        self.post_empty(&["cache", "invalidate", "part", part_id, param_name, param_value])
            .await
    }

    /// Invalidates every part of a cache group
    /// (`POST /octoparts/2/cache/invalidate/cache-group/{group_name}/parts`).
    pub async fn invalidate_cache_group(&self, group_name: &str) -> Result<HttpResponse> {
        self.post_empty(&["cache", "invalidate", "cache-group", group_name, "parts"])
            .await
    }

    /// Invalidates a cache group for one parameter value
    /// (`POST /octoparts/2/cache/invalidate/cache-group/{group_name}/params/{param_value}`).
    pub async fn invalidate_cache_group_param(
        &self,
        group_name: &str,
        param_value: &str,
    ) -> Result<HttpResponse> {
        self.post_empty(&[
            "cache",
            "invalidate",
            "cache-group",
            group_name,
            "params",
            param_value,
        ])
        .await
    }

    /// Makes a GET request to a path relative to the endpoint.
    ///
    /// The response is classified like any other call but its body is not parsed.
    pub async fn get(&self, path: &str) -> Result<HttpResponse> {
        let request = HttpRequest::new(Method::GET, self.url(split_path(path))?);
        self.execute(request).await
    }

    /// Makes a POST request to a path relative to the endpoint.
    pub async fn post(&self, path: &str, body: Option<String>) -> Result<HttpResponse> {
        let mut request = HttpRequest::new(Method::POST, self.url(split_path(path))?);
        if let Some(body) = body {
            request = request
                .with_header(CONTENT_TYPE, "application/json")?
                .with_body(body);
        }
        self.execute(request).await
    }

    async fn post_empty(&self, segments: &[&str]) -> Result<HttpResponse> {
        let url = self.api_url(segments)?;
        self.execute(HttpRequest::new(Method::POST, url)).await
    }

    /// Builds `/octoparts/2/{segments...}`, one literal segment per name or value.
    ///
    /// Empty, `.` and `..` segments would be dropped or resolved by URL
    /// normalization and address a different route, so they are rejected.
    fn api_url(&self, segments: &[&str]) -> Result<Url> {
        if let Some(segment) = segments
            .iter()
            .find(|s| matches!(**s, "" | "." | ".."))
        {
            return Err(Error::Argument(format!(
                "path segment {:?} cannot be sent literally",
                segment
            )));
        }
        let mut path: Vec<&str> = API_ROOT.to_vec();
        path.extend_from_slice(segments);
        self.url(path)
    }

    /// Appends percent-encoded path segments to the endpoint.
    fn url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.inner.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::Configuration(format!(
                    "Endpoint {} cannot have path segments",
                    self.inner.endpoint
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends one request and classifies the outcome.
    async fn execute(&self, mut request: HttpRequest) -> Result<HttpResponse> {
        for (name, value) in &self.inner.default_headers {
            if !request.headers.contains_key(name) {
                request.headers.insert(name.clone(), value.clone());
            }
        }

        let method = request.method.clone();
        let url = request.url.clone();

        tracing::debug!(
            method = %method,
            url = %url,
            body_len = request.body.as_ref().map_or(0, String::len),
            "Executing HTTP request"
        );

        let start_time = Instant::now();
        let response = match self.inner.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    method = %method,
                    url = %url,
                    "Request failed"
                );
                return Err(e.into());
            }
        };

        tracing::info!(
            status = response.status.as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "Received HTTP response"
        );

        classify_response(response)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.trim_start_matches('/').split('/')
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use octoparts::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), octoparts::Error> {
/// let client = ClientBuilder::new()
///     .endpoint("http://octoparts.internal:9000")?
///     .open_timeout(Duration::from_secs(1))
///     .timeout(Duration::from_secs(5))
///     .default_header("X-Service", "web")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    endpoint: String,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
    open_timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Creates a builder from the process-wide [`Config::global`].
    pub fn new() -> Self {
        Self::from_config(Config::global().clone())
    }

    /// Creates a builder from an explicit configuration.
    pub fn from_config(config: Config) -> Self {
        Self {
            endpoint: config.endpoint,
            default_headers: config.headers,
            timeout: config.timeout,
            open_timeout: config.open_timeout,
            transport: None,
        }
    }

    /// Sets the gateway base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn endpoint(mut self, url: impl AsRef<str>) -> Result<Self> {
        Url::parse(url.as_ref())?;
        self.endpoint = url.as_ref().to_string();
        Ok(self)
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the read-phase deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect-phase deadline.
    pub fn open_timeout(mut self, open_timeout: Duration) -> Self {
        self.open_timeout = Some(open_timeout);
        self
    }

    /// Uses a custom transport instead of the default `reqwest` one.
    ///
    /// The transport owns its own deadlines; `timeout` and `open_timeout`
    /// are ignored when one is set.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is invalid or the default transport
    /// cannot be built.
    pub fn build(self) -> Result<Client> {
        let endpoint = Url::parse(&self.endpoint)?;
        if endpoint.cannot_be_a_base() {
            return Err(Error::Configuration(format!(
                "Endpoint {} cannot have path segments",
                endpoint
            )));
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.open_timeout, self.timeout)?),
        };

        let mut default_headers = self.default_headers;
        default_headers
            .entry(ACCEPT)
            .or_insert(HeaderValue::from_static("application/json"));

        Ok(Client {
            inner: Arc::new(ClientInner {
                transport,
                endpoint,
                default_headers,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
