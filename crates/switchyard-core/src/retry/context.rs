//! Per-call retry state.

use std::time::Duration;

use tokio::time::Instant;

use super::policy::ErrorKind;
use crate::message::Response;

/// Owned by exactly one logical call; the attempt count only grows.
#[derive(Debug)]
pub struct RetryContext {
    attempts: u32,
    started: Instant,
    last_failure: Option<ErrorKind>,
    last_response: Option<Response>,
}

impl RetryContext {
    pub fn new() -> Self {
        Self {
            attempts: 0,
            started: Instant::now(),
            last_failure: None,
            last_response: None,
        }
    }

    pub(crate) fn begin_attempt(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }

    /// A failure without a response clears the previous one.
    pub(crate) fn record_failure(&mut self, kind: ErrorKind, response: Option<&Response>) {
        self.last_failure = Some(kind);
        self.last_response = response.cloned();
    }

    /// Attempts started so far, including the first.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn retries(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn last_failure(&self) -> Option<ErrorKind> {
        self.last_failure
    }

    pub fn last_response(&self) -> Option<&Response> {
        self.last_response.as_ref()
    }
}

impl Default for RetryContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[tokio::test(start_paused = true)]
    async fn tracks_attempts_and_last_failure() {
        let mut ctx = RetryContext::new();
        assert_eq!(ctx.attempts(), 0);
        assert_eq!(ctx.retries(), 0);

        ctx.begin_attempt();
        let unavailable = Response::new(StatusCode::SERVICE_UNAVAILABLE);
        ctx.record_failure(ErrorKind::Throttled, Some(&unavailable));
        assert_eq!(ctx.last_failure(), Some(ErrorKind::Throttled));
        assert_eq!(
            ctx.last_response().map(Response::status),
            Some(StatusCode::SERVICE_UNAVAILABLE)
        );

        ctx.begin_attempt();
        ctx.record_failure(ErrorKind::Connection, None);
        assert_eq!(ctx.attempts(), 2);
        assert_eq!(ctx.retries(), 1);
        assert!(ctx.last_response().is_none());

        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(ctx.elapsed(), Duration::from_secs(3));
    }
}
