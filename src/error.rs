//! Error types for Octoparts calls.
//!
//! Every failure of a public [`Client`](crate::Client) operation is reported as
//! exactly one [`Error`]. HTTP-derived variants keep the status code and the raw
//! response body so callers can log or re-raise them with full context.

use http::{HeaderMap, StatusCode};

/// Boxed error used as the source of transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for Octoparts calls.
///
/// # Examples
///
/// ```no_run
/// use octoparts::{Client, Error};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder().endpoint("http://localhost:9000")?.build()?;
///
/// match client.invoke(json!({"request_meta": {"timeout": 500}})).await {
///     Ok(response) => println!("{} parts", response.responses.len()),
///     Err(Error::Client { status, body, .. }) => {
///         eprintln!("request rejected ({status}): {body}");
///     }
///     Err(e) => eprintln!("call failed: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The caller passed no usable input. Raised before any network activity.
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// The server answered with a 4xx status.
    ///
    /// The request was structurally acceptable but the gateway rejected it,
    /// e.g. because `requestMeta.id` was missing.
    #[error("Client error {status}: {body}")]
    Client {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        body: String,
        /// The response headers
        headers: HeaderMap,
    },

    /// The server answered with a 5xx status, or any other non-2xx status
    /// that is not a client error.
    #[error("Server error {status}: {body}")]
    Server {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        body: String,
        /// The response headers
        headers: HeaderMap,
    },

    /// The connect or read deadline elapsed before a response was obtained.
    #[error("Request timed out: {0}")]
    Timeout(#[source] BoxError),

    /// The transport failed for a reason other than a timeout
    /// (connection refused, DNS failure, broken connection...).
    #[error("Network error: {0}")]
    Network(#[source] BoxError),

    /// A response body could not be reconstructed into the response model.
    ///
    /// `status` is set when the body came from an HTTP exchange and is `None`
    /// when [`wire::parse`](crate::wire::parse) was called directly.
    #[error("Failed to parse response: {message}")]
    Parse {
        /// The HTTP status code of the exchange, if any
        status: Option<StatusCode>,
        /// The raw response body that failed to parse
        raw_response: String,
        /// The parser's error message
        message: String,
    },

    /// The request could not be encoded as JSON.
    #[error("Failed to serialize request: {0}")]
    Serialization(String),

    /// Invalid client configuration (endpoint, headers, timeouts).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An invalid endpoint URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// The kind of an [`Error`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Argument,
    Client,
    Server,
    Timeout,
    Network,
    Parse,
    Configuration,
}

impl Error {
    /// Returns the discriminant of this error.
    ///
    /// Serialization failures are reported as [`ErrorKind::Argument`] since they
    /// can only stem from the caller's input. Invalid URLs are configuration errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use octoparts::{Error, ErrorKind};
    ///
    /// let err = Error::Argument("request must not be null".to_string());
    /// assert_eq!(err.kind(), ErrorKind::Argument);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Argument(_) | Error::Serialization(_) => ErrorKind::Argument,
            Error::Client { .. } => ErrorKind::Client,
            Error::Server { .. } => ErrorKind::Server,
            Error::Timeout(_) => ErrorKind::Timeout,
            Error::Network(_) => ErrorKind::Network,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::Configuration(_) | Error::InvalidUrl(_) => ErrorKind::Configuration,
        }
    }

    /// Returns the HTTP status code if this error has one.
    ///
    /// Always `Some` for `Client` and `Server` errors; `Some` for `Parse`
    /// errors raised by a client call.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Client { status, .. } | Error::Server { status, .. } => Some(*status),
            Error::Parse { status, .. } => *status,
            _ => None,
        }
    }

    /// Attaches the status of the exchange that produced a `Parse` error.
    /// Other errors are returned unchanged.
    pub(crate) fn with_status(self, status: StatusCode) -> Self {
        match self {
            Error::Parse {
                raw_response,
                message,
                ..
            } => Error::Parse {
                status: Some(status),
                raw_response,
                message,
            },
            other => other,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Client { body, .. } | Error::Server { body, .. } => Some(body),
            Error::Parse { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

/// A specialized `Result` type for Octoparts calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_errors_expose_status_and_body() {
        let err = Error::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "NG".to_string(),
            headers: HeaderMap::new(),
        };
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.raw_response(), Some("NG"));
        assert_eq!(err.to_string(), "Server error 500 Internal Server Error: NG");
    }

    #[test]
    fn local_errors_have_no_status() {
        let err = Error::Argument("request must not be null".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.raw_response(), None);

        let err = Error::Timeout("deadline elapsed".into());
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn parse_errors_carry_a_status_only_after_an_exchange() {
        let err = Error::Parse {
            status: None,
            raw_response: "not json".to_string(),
            message: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(err.status(), None);
        assert_eq!(
            err.to_string(),
            "Failed to parse response: expected value at line 1 column 1"
        );

        let err = err.with_status(StatusCode::OK);
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.status(), Some(StatusCode::OK));
        assert_eq!(err.raw_response(), Some("not json"));
    }

    #[test]
    fn with_status_leaves_other_errors_alone() {
        let err = Error::Argument("empty".to_string()).with_status(StatusCode::OK);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn invalid_url_is_a_configuration_error() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
