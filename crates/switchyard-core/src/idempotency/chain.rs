//! Ordered detector chain with bounded re-entry.

use super::detectors::{
    ConditionalDetector, IdempotencyKeyDetector, IdempotentMethodDetector, MethodOverrideDetector,
    SafeMethodDetector, IDEMPOTENCY_KEY, METHOD_OVERRIDE,
};
use crate::message::RequestArguments;

/// Outcome of asking whether a request may be sent twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Retryable,
    NotRetryable,
    /// No opinion; ask the next detector.
    Neutral,
}

/// One link of the chain.
pub trait IdempotencyDetector: Send + Sync {
    /// `root` re-runs the whole chain, e.g. on a copy with a rewritten method.
    fn test(&self, arguments: &RequestArguments, root: &ChainRoot<'_>) -> Decision;
}

/// Handle passed to detectors for re-testing from the head of the chain.
pub struct ChainRoot<'a> {
    chain: &'a IdempotencyChain,
    depth: usize,
}

impl ChainRoot<'_> {
    /// Runs the chain from its head on `arguments`. Returns `Neutral` once the
    /// nesting exceeds the number of detectors.
    pub fn test(&self, arguments: &RequestArguments) -> Decision {
        if self.depth >= self.chain.detectors.len() {
            tracing::warn!(
                "idempotency re-test depth {} exceeded for {}",
                self.depth,
                arguments.method()
            );
            return Decision::Neutral;
        }
        self.chain.evaluate(arguments, self.depth + 1)
    }
}

/// First non-neutral decision wins; an all-neutral chain resolves to
/// [`Decision::NotRetryable`].
pub struct IdempotencyChain {
    detectors: Vec<Box<dyn IdempotencyDetector>>,
}

impl IdempotencyChain {
    pub fn new(detectors: Vec<Box<dyn IdempotencyDetector>>) -> Self {
        Self { detectors }
    }

    /// Safe methods, PUT/DELETE, method override, then idempotency key.
    pub fn with_headers(idempotency_key_header: &str, method_override_header: &str) -> Self {
        Self::new(vec![
            Box::new(SafeMethodDetector),
            Box::new(IdempotentMethodDetector),
            Box::new(MethodOverrideDetector::new(method_override_header)),
            Box::new(IdempotencyKeyDetector::new(idempotency_key_header)),
        ])
    }

    pub fn with_key_header(idempotency_key_header: &str) -> Self {
        Self::with_headers(idempotency_key_header, METHOD_OVERRIDE)
    }

    /// Appends `If-Match` / `If-None-Match` / `If-Unmodified-Since` detection.
    pub fn with_conditional_requests(mut self) -> Self {
        self.detectors.push(Box::new(ConditionalDetector));
        self
    }

    pub fn push(mut self, detector: impl IdempotencyDetector + 'static) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    /// Resolved decision: never `Neutral`.
    pub fn test(&self, arguments: &RequestArguments) -> Decision {
        match self.evaluate(arguments, 0) {
            Decision::Neutral => Decision::NotRetryable,
            decided => decided,
        }
    }

    fn evaluate(&self, arguments: &RequestArguments, depth: usize) -> Decision {
        let root = ChainRoot { chain: self, depth };
        for detector in &self.detectors {
            match detector.test(arguments, &root) {
                Decision::Neutral => continue,
                decided => return decided,
            }
        }
        Decision::Neutral
    }
}

impl Default for IdempotencyChain {
    fn default() -> Self {
        Self::with_key_header(IDEMPOTENCY_KEY)
    }
}
