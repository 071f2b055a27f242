//! Classify HTTP statuses, transport errors and attempt failures into retry
//! policy error kinds.

use http::StatusCode;

use super::error::Failure;
use super::policy::ErrorKind;
use crate::transport::{TransportError, TransportErrorKind};

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(status: StatusCode) -> ErrorKind {
    match status.as_u16() {
        429 | 503 => ErrorKind::Throttled,
        code @ 500..=599 => ErrorKind::Http5xx(code),
        _ => ErrorKind::Other,
    }
}

pub fn classify_transport_error(e: &TransportError) -> ErrorKind {
    match e.kind() {
        TransportErrorKind::Timeout => ErrorKind::Timeout,
        TransportErrorKind::Connection => ErrorKind::Connection,
        TransportErrorKind::Other => ErrorKind::Other,
    }
}

/// Dispatch failures (no route, handler error) are never retried.
pub fn classify(failure: &Failure) -> ErrorKind {
    match failure {
        Failure::Transport(e) => classify_transport_error(e),
        Failure::Status(response) => classify_http_status(response.status()),
        Failure::RetryRequested(_) => ErrorKind::Requested,
        Failure::Dispatch(_) => ErrorKind::Other,
    }
}
