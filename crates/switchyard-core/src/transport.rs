//! Transport collaborator interface.
//!
//! Socket I/O, pooling and TLS live behind this trait. A transport resolves
//! each request to a [`Response`] for any status code; only failures to obtain
//! a response at all are reported as [`TransportError`]. Dropping the returned
//! future must abort the exchange.

use std::fmt;

use async_trait::async_trait;

use crate::message::{RequestArguments, Response};

/// Coarse reason a transport failed, used for retry classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connect or read timed out.
    Timeout,
    /// Connection refused/reset, DNS failure, premature EOF.
    Connection,
    /// Anything else (TLS misconfiguration, invalid request, ...).
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::Connection => write!(f, "connection"),
            TransportErrorKind::Other => write!(f, "transport"),
        }
    }
}

/// Failure to obtain any response for a request.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connection, message)
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, arguments: &RequestArguments) -> Result<Response, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, arguments: &RequestArguments) -> Result<Response, TransportError> {
        (**self).execute(arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_includes_kind_and_message() {
        let e = TransportError::timeout("read timed out after 1s");
        assert_eq!(e.to_string(), "timeout error: read timed out after 1s");
        assert_eq!(e.kind(), TransportErrorKind::Timeout);
    }

    #[test]
    fn source_is_exposed() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let e = TransportError::connection("connection lost").with_source(io);
        assert!(e.source().is_some());
    }
}
