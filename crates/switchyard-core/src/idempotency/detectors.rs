//! Built-in detectors.

use http::header::{IF_MATCH, IF_NONE_MATCH, IF_UNMODIFIED_SINCE};
use http::Method;

use super::chain::{ChainRoot, Decision, IdempotencyDetector};
use crate::message::RequestArguments;

pub const IDEMPOTENCY_KEY: &str = "Idempotency-Key";
pub const METHOD_OVERRIDE: &str = "X-HTTP-Method-Override";

/// GET, HEAD, OPTIONS and TRACE.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafeMethodDetector;

impl IdempotencyDetector for SafeMethodDetector {
    fn test(&self, arguments: &RequestArguments, _root: &ChainRoot<'_>) -> Decision {
        if is_safe(arguments.method()) {
            Decision::Retryable
        } else {
            Decision::Neutral
        }
    }
}

/// PUT and DELETE: idempotent but not safe.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdempotentMethodDetector;

impl IdempotencyDetector for IdempotentMethodDetector {
    fn test(&self, arguments: &RequestArguments, _root: &ChainRoot<'_>) -> Decision {
        let method = arguments.method();
        if *method == Method::PUT || *method == Method::DELETE {
            Decision::Retryable
        } else {
            Decision::Neutral
        }
    }
}

/// A POST tunnelling another method is judged as that method.
#[derive(Debug, Clone)]
pub struct MethodOverrideDetector {
    header: String,
}

impl MethodOverrideDetector {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }
}

impl Default for MethodOverrideDetector {
    fn default() -> Self {
        Self::new(METHOD_OVERRIDE)
    }
}

impl IdempotencyDetector for MethodOverrideDetector {
    fn test(&self, arguments: &RequestArguments, root: &ChainRoot<'_>) -> Decision {
        if *arguments.method() != Method::POST {
            return Decision::Neutral;
        }
        let Some(raw) = arguments.header(&self.header) else {
            return Decision::Neutral;
        };
        match parse_override(raw) {
            Some(method) => root.test(&arguments.with_method(method)),
            None => {
                tracing::warn!(
                    "Received invalid method in {} header: \"{}\"",
                    self.header,
                    raw
                );
                Decision::Neutral
            }
        }
    }
}

/// Exact, case-sensitive standard method names other than POST.
fn parse_override(raw: &str) -> Option<Method> {
    let method = match raw {
        "GET" => Method::GET,
        "HEAD" => Method::HEAD,
        "PUT" => Method::PUT,
        "PATCH" => Method::PATCH,
        "DELETE" => Method::DELETE,
        "OPTIONS" => Method::OPTIONS,
        "TRACE" => Method::TRACE,
        _ => return None,
    };
    Some(method)
}

/// Any value in the configured key header makes the request retryable.
#[derive(Debug, Clone)]
pub struct IdempotencyKeyDetector {
    header: String,
}

impl IdempotencyKeyDetector {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }
}

impl Default for IdempotencyKeyDetector {
    fn default() -> Self {
        Self::new(IDEMPOTENCY_KEY)
    }
}

impl IdempotencyDetector for IdempotencyKeyDetector {
    fn test(&self, arguments: &RequestArguments, _root: &ChainRoot<'_>) -> Decision {
        if arguments.headers().contains_key(self.header.as_str()) {
            Decision::Retryable
        } else {
            Decision::Neutral
        }
    }
}

/// Preconditioned writes (`If-Match`, `If-None-Match`, `If-Unmodified-Since`)
/// cannot apply twice.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionalDetector;

impl IdempotencyDetector for ConditionalDetector {
    fn test(&self, arguments: &RequestArguments, _root: &ChainRoot<'_>) -> Decision {
        let headers = arguments.headers();
        if headers.contains_key(IF_MATCH)
            || headers.contains_key(IF_NONE_MATCH)
            || headers.contains_key(IF_UNMODIFIED_SINCE)
        {
            Decision::Retryable
        } else {
            Decision::Neutral
        }
    }
}

fn is_safe(method: &Method) -> bool {
    *method == Method::GET
        || *method == Method::HEAD
        || *method == Method::OPTIONS
        || *method == Method::TRACE
}
