//! Retry orchestration around a fallible async attempt.

use std::future::Future;
use std::sync::Arc;

use super::classify::{classify, classify_http_status};
use super::context::RetryContext;
use super::delay::resolve_delay;
use super::error::{CallError, Failure};
use super::policy::{ErrorKind, RetryDecision, RetryLimiter, RetryPolicy};
use crate::clock::{Clock, SystemClock};
use crate::control::CallControl;
use crate::idempotency::{Decision, IdempotencyChain};
use crate::message::{RequestArguments, Response};
use crate::transport::Transport;

/// Retries failed attempts that are both retryable and idempotent, waiting
/// for the server's `Retry-After` hint or the policy backoff in between.
#[derive(Clone)]
pub struct RetryPlugin {
    policy: RetryPolicy,
    limiter: Arc<dyn RetryLimiter>,
    chain: Arc<IdempotencyChain>,
    clock: Arc<dyn Clock>,
}

impl RetryPlugin {
    /// `policy` is also the limiter until [`with_limiter`](Self::with_limiter)
    /// replaces it.
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            limiter: Arc::new(policy.clone()),
            policy,
            chain: Arc::new(IdempotencyChain::default()),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_limiter(mut self, limiter: impl RetryLimiter + 'static) -> Self {
        self.limiter = Arc::new(limiter);
        self
    }

    pub fn with_chain(mut self, chain: IdempotencyChain) -> Self {
        self.chain = Arc::new(chain);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Wraps `transport` so every `execute` goes through this plugin.
    pub fn decorate<T: Transport>(&self, transport: T) -> RetryingTransport<T> {
        RetryingTransport {
            inner: transport,
            plugin: self.clone(),
        }
    }

    /// Maps a retryable status to a failure when the policy asks for it and
    /// the request may be retried. Anything else is left for routing.
    pub fn check_status(
        &self,
        arguments: &RequestArguments,
        response: Response,
    ) -> Result<Response, Failure> {
        if self.claims_status(arguments, &response) {
            Err(Failure::Status(response))
        } else {
            Ok(response)
        }
    }

    fn claims_status(&self, arguments: &RequestArguments, response: &Response) -> bool {
        self.policy.retry_server_errors
            && classify_http_status(response.status()).is_retryable()
            && self.chain.test(arguments) == Decision::Retryable
    }

    /// Runs `attempt` until it succeeds, the failure is terminal, the limiter
    /// stops retrying, or `control` is cancelled. Attempts never overlap.
    pub async fn run<T, F, Fut>(
        &self,
        arguments: &RequestArguments,
        control: &CallControl,
        mut attempt: F,
    ) -> Result<T, CallError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Failure>>,
    {
        let mut ctx = RetryContext::new();
        let mut idempotent: Option<bool> = None;

        loop {
            if control.is_cancelled() {
                return Err(CallError::Cancelled);
            }
            ctx.begin_attempt();

            let outcome = tokio::select! {
                biased;
                _ = control.cancelled() => return Err(CallError::Cancelled),
                outcome = attempt() => outcome,
            };
            let failure = match outcome {
                Ok(value) => return Ok(value),
                Err(failure) => failure,
            };

            let kind = classify(&failure);
            ctx.record_failure(kind, failure.response());
            match self.decide(&ctx, arguments, kind, &mut idempotent) {
                RetryDecision::NoRetry => return Err(CallError::Failed(failure)),
                RetryDecision::Exhausted => {
                    tracing::debug!(
                        "{} {}: giving up after {} attempt(s)",
                        arguments.method(),
                        arguments.uri_template(),
                        ctx.attempts()
                    );
                    return Err(CallError::RetryExhausted {
                        attempts: ctx.attempts(),
                        last: failure,
                    });
                }
                RetryDecision::RetryAfter(delay) => {
                    tracing::debug!(
                        "{} {}: attempt {} failed ({}), retrying in {:?}",
                        arguments.method(),
                        arguments.uri_template(),
                        ctx.attempts(),
                        failure,
                        delay
                    );
                    tokio::select! {
                        biased;
                        _ = control.cancelled() => return Err(CallError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    fn decide(
        &self,
        ctx: &RetryContext,
        arguments: &RequestArguments,
        kind: ErrorKind,
        idempotent: &mut Option<bool>,
    ) -> RetryDecision {
        if !kind.is_retryable() {
            return RetryDecision::NoRetry;
        }
        let idempotent =
            *idempotent.get_or_insert_with(|| self.chain.test(arguments) == Decision::Retryable);
        if !idempotent {
            tracing::debug!(
                "{} {}: not retrying non-idempotent request",
                arguments.method(),
                arguments.uri_template()
            );
            return RetryDecision::NoRetry;
        }
        if self.limiter.should_stop_retrying(ctx) {
            return RetryDecision::Exhausted;
        }

        let fallback = self.policy.fallback_delay(ctx.attempts());
        let delay = match ctx.last_response() {
            Some(response) => resolve_delay(response.headers(), self.clock.now(), fallback),
            None => fallback,
        };
        RetryDecision::RetryAfter(self.policy.cap_delay(delay, ctx.elapsed()))
    }
}

/// A transport whose `execute` retries per the wrapped plugin. Responses are
/// returned without routing.
pub struct RetryingTransport<T> {
    inner: T,
    plugin: RetryPlugin,
}

impl<T: Transport> RetryingTransport<T> {
    pub async fn execute(
        &self,
        arguments: &RequestArguments,
        control: &CallControl,
    ) -> Result<Response, CallError> {
        self.plugin
            .run(arguments, control, || async {
                let response = self.inner.execute(arguments).await?;
                self.plugin.check_status(arguments, response)
            })
            .await
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}
