//! Dispatch failures.
//!
//! A level without a matching binding is reported as [`NoRouteMatched`]; an
//! error raised by a route is carried as-is in [`DispatchError::Route`] so the
//! caller can downcast it. The two are never conflated.

use std::fmt;

use super::navigator::AttributeKind;
use super::route::RetryRequested;
use crate::message::Response;

/// Error type routes fail with.
pub type RouteError = Box<dyn std::error::Error + Send + Sync>;

/// No exact or wildcard binding existed for the observed value.
#[derive(Debug)]
pub struct NoRouteMatched {
    pub kind: AttributeKind,
    pub value: String,
    pub response: Response,
}

impl fmt::Display for NoRouteMatched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no route for {} {} (response status {})",
            self.kind,
            self.value,
            self.response.status()
        )
    }
}

impl std::error::Error for NoRouteMatched {}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    NoRouteMatched(Box<NoRouteMatched>),

    #[error("route failed: {0}")]
    Route(#[source] RouteError),
}

impl DispatchError {
    /// True when a `retry()` route handled the response.
    pub fn is_retry_requested(&self) -> bool {
        matches!(self, DispatchError::Route(e) if e.is::<RetryRequested>())
    }

    pub fn no_route(&self) -> Option<&NoRouteMatched> {
        match self {
            DispatchError::NoRouteMatched(e) => Some(&**e),
            DispatchError::Route(_) => None,
        }
    }
}

/// A binding list that cannot be turned into a level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    #[error("duplicate binding for {kind} {value}")]
    DuplicateValue { kind: AttributeKind, value: String },

    #[error("more than one wildcard binding for {0}")]
    DuplicateWildcard(AttributeKind),
}
