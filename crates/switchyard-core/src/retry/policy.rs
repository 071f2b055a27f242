use std::time::Duration;

use super::context::RetryContext;

/// High-level classification of a failed attempt for retry purposes.
///
/// Callers map transport errors, HTTP statuses and retry routes into these
/// kinds; only `Other` is terminal regardless of policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport gave up waiting (connect/read).
    Timeout,
    /// Server asked us to slow down (429, 503).
    Throttled,
    /// Network-level failure (connection reset, DNS, etc.).
    Connection,
    /// Retryable 5xx that is not throttling.
    Http5xx(u16),
    /// A `retry()` route asked for another attempt.
    Requested,
    /// Anything else; never retried.
    Other,
}

impl ErrorKind {
    pub fn is_retryable(self) -> bool {
        !matches!(self, ErrorKind::Other)
    }
}

/// Outcome of evaluating one failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Failure is terminal; surface it as is.
    NoRetry,
    /// Retryable, but the limiter refused another attempt.
    Exhausted,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Fallback delay used when the server gives no usable hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed(Duration),
    /// `base * 2^(retry-1)`, capped at `max`.
    Exponential { base: Duration, max: Duration },
}

impl Backoff {
    /// Delay before retry number `retry` (1-based).
    pub fn delay(&self, retry: u32) -> Duration {
        match *self {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base, max } => {
                let exp = 1u32 << retry.saturating_sub(1).min(16);
                base.saturating_mul(exp).min(max)
            }
        }
    }
}

const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Exponential {
            base: Duration::from_millis(250),
            max: DEFAULT_MAX_DELAY,
        }
    }
}

/// Decides when a call has retried enough. Implemented by [`RetryPolicy`];
/// a circuit breaker or budget can be plugged in instead.
pub trait RetryLimiter: Send + Sync {
    /// Called after each retryable failure, before any delay.
    fn should_stop_retrying(&self, context: &RetryContext) -> bool;
}

/// Retry limits and backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt; 0 disables retrying.
    pub max_retries: u32,
    /// Total time budget measured from the first attempt.
    pub max_duration: Option<Duration>,
    pub backoff: Backoff,
    /// Upper bound on a server-supplied `Retry-After`. Defaults to the
    /// backoff maximum.
    pub max_retry_after: Option<Duration>,
    /// Treat 429/503/5xx responses to idempotent requests as failed attempts
    /// before routing them.
    pub retry_server_errors: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 4,
            max_duration: None,
            backoff: Backoff::default(),
            max_retry_after: Some(DEFAULT_MAX_DELAY),
            retry_server_errors: true,
        }
    }
}

impl RetryPolicy {
    /// Backoff delay for the next retry given the attempts made so far.
    pub fn fallback_delay(&self, attempts: u32) -> Duration {
        self.backoff.delay(attempts.max(1))
    }

    /// Applies `max_retry_after` and the remaining `max_duration` budget.
    pub fn cap_delay(&self, delay: Duration, elapsed: Duration) -> Duration {
        let mut delay = delay;
        if let Some(max) = self.max_retry_after {
            delay = delay.min(max);
        }
        if let Some(budget) = self.max_duration {
            delay = delay.min(budget.saturating_sub(elapsed));
        }
        delay
    }
}

impl RetryLimiter for RetryPolicy {
    fn should_stop_retrying(&self, context: &RetryContext) -> bool {
        if context.retries() >= self.max_retries {
            return true;
        }
        matches!(self.max_duration, Some(budget) if context.elapsed() >= budget)
    }
}
