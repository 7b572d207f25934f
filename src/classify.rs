//! Mapping transport outcomes onto [`Error`].
//!
//! Local input problems are caught earlier, as [`Error::Argument`]. This module
//! handles the two remaining origins: the transport failing outright, and the
//! server answering with a non-2xx status.

use crate::transport::{HttpResponse, TransportError};
use crate::{Error, Result};

impl From<TransportError> for Error {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Timeout(source) => Error::Timeout(source),
            TransportError::Network(source) => Error::Network(source),
        }
    }
}

/// Passes 2xx responses through and turns everything else into an error.
///
/// 4xx becomes [`Error::Client`]; 5xx and any other non-2xx status becomes
/// [`Error::Server`].
pub fn classify_response(response: HttpResponse) -> Result<HttpResponse> {
    let status = response.status;
    if status.is_success() {
        return Ok(response);
    }

    if status.is_client_error() {
        tracing::error!(
            status = status.as_u16(),
            response = %response.body,
            "Client error (4xx)"
        );
        Err(Error::Client {
            status,
            body: response.body,
            headers: response.headers,
        })
    } else {
        tracing::warn!(
            status = status.as_u16(),
            response = %response.body,
            "Server error"
        );
        Err(Error::Server {
            status,
            body: response.body,
            headers: response.headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use http::{HeaderMap, StatusCode};

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn success_passes_through() {
        let ok = classify_response(response(204, "")).unwrap();
        assert_eq!(ok.status, StatusCode::NO_CONTENT);
    }

    #[test]
    fn client_errors_keep_status_and_body() {
        let err = classify_response(response(400, "requestMeta.id is required")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Client);
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(err.raw_response(), Some("requestMeta.id is required"));
    }

    #[test]
    fn server_errors_keep_status_and_body() {
        let err = classify_response(response(500, "NG")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.raw_response(), Some("NG"));
    }

    #[test]
    fn redirects_are_server_rejections() {
        let err = classify_response(response(302, "")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Server);
    }

    #[test]
    fn transport_errors_map_one_to_one() {
        let err: Error = TransportError::Timeout("read deadline".into()).into();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        let err: Error = TransportError::Network("connection refused".into()).into();
        assert_eq!(err.kind(), ErrorKind::Network);
    }
}
