//! Retry and backoff policy.
//!
//! This module classifies failed attempts (timeouts, throttling, connection
//! failures, retry routes), resolves the wait before the next attempt from
//! `Retry-After` or the policy backoff, and runs the retry loop so that the
//! client and the decorated transport share one behaviour.

mod classify;
mod context;
mod delay;
mod error;
mod plugin;
mod policy;

pub use classify::{classify, classify_http_status, classify_transport_error};
pub use context::RetryContext;
pub use delay::resolve_delay;
pub use error::{CallError, Failure};
pub use plugin::{RetryPlugin, RetryingTransport};
pub use policy::{Backoff, ErrorKind, RetryDecision, RetryLimiter, RetryPolicy};
