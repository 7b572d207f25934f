//! Response wrapper that preserves both parsed data and raw response details.
//!
//! The [`Response`] type wraps the parsed [`AggregateResponse`](crate::AggregateResponse)
//! along with metadata about the HTTP exchange: latency, status code, headers and
//! the raw body for debugging.

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A wrapper around a successful HTTP response.
///
/// Dereferences to the parsed data, so `response.responses` reaches the
/// part responses directly.
///
/// # Examples
///
/// ```no_run
/// use octoparts::{AggregateRequest, Client, PartRequest, RequestMeta};
///
/// # async fn example() -> Result<(), octoparts::Error> {
/// let client = Client::new()?;
/// let request = AggregateRequest::builder()
///     .request_meta(RequestMeta::new().id("test").timeout(500))
///     .part_request(PartRequest::new("echo").add_param("fooValue", "test"))
///     .build()?;
///
/// let response = client.invoke(request).await?;
/// println!("{} parts in {:?}", response.responses.len(), response.latency);
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The parsed response data.
    pub data: T,

    /// The raw response body as a string.
    pub raw_body: String,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from dispatching the request to receiving the full body.
    pub latency: Duration,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(
        data: T,
        raw_body: String,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            headers,
            latency,
        }
    }

    /// Maps the response data to a different type, keeping the metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// # use octoparts::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     42,
    ///     "42".to_string(),
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::from_millis(100),
    /// );
    ///
    /// let string_response = response.map(|n| n.to_string());
    /// assert_eq!(string_response.data, "42");
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            raw_body: self.raw_body,
            status: self.status,
            headers: self.headers,
            latency: self.latency,
        }
    }

    /// Returns a reference to a header value by name.
    ///
    /// # Examples
    ///
    /// ```
    /// # use octoparts::Response;
    /// # use http::{HeaderMap, StatusCode, HeaderValue};
    /// # use std::time::Duration;
    /// let mut headers = HeaderMap::new();
    /// headers.insert("content-type", HeaderValue::from_static("application/json"));
    ///
    /// let response = Response::new((), String::new(), StatusCode::OK, headers, Duration::ZERO);
    ///
    /// assert_eq!(response.header("content-type").unwrap(), "application/json");
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
