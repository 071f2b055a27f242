//! Attempt and call error types.

use crate::dispatch::DispatchError;
use crate::message::Response;
use crate::transport::TransportError;

/// One failed attempt. Kept separate from [`CallError`] so the retry loop can
/// classify it before deciding what the caller sees.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Status classified as retryable before routing (429, 503, 5xx).
    #[error("server responded {}", .0.status())]
    Status(Response),
    /// A `retry()` route matched this response.
    #[error("route requested retry of {}", .0.status())]
    RetryRequested(Response),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl Failure {
    /// The response behind this failure, if one was received.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Failure::Status(response) | Failure::RetryRequested(response) => Some(response),
            Failure::Dispatch(e) => e.no_route().map(|n| &n.response),
            Failure::Transport(_) => None,
        }
    }
}

/// Final outcome of a call that did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// Terminal failure, surfaced unmodified.
    #[error(transparent)]
    Failed(Failure),
    #[error("retries exhausted after {attempts} attempt(s): {last}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        last: Failure,
    },
    #[error("call cancelled")]
    Cancelled,
}

impl CallError {
    /// The failure the caller ends up with, if any.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            CallError::Failed(failure) | CallError::RetryExhausted { last: failure, .. } => {
                Some(failure)
            }
            CallError::Cancelled => None,
        }
    }

    pub fn last_response(&self) -> Option<&Response> {
        self.failure().and_then(Failure::response)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, CallError::Cancelled)
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, CallError::RetryExhausted { .. })
    }
}
