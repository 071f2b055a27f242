//! Idempotency detection.
//!
//! Decides whether a request may be re-sent after a failure. Detectors run in
//! order and the first non-neutral answer wins. A detector can re-run the
//! whole chain on a rewritten copy of the request (the method override
//! detector does this); nesting is bounded by the chain length.

mod chain;
mod detectors;

pub use chain::{ChainRoot, Decision, IdempotencyChain, IdempotencyDetector};
pub use detectors::{
    ConditionalDetector, IdempotencyKeyDetector, IdempotentMethodDetector, MethodOverrideDetector,
    SafeMethodDetector, IDEMPOTENCY_KEY, METHOD_OVERRIDE,
};
