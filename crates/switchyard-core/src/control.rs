//! Call control: a shared cancellation token for one logical call.
//!
//! The retry loop checks the token before each attempt, races it against the
//! in-flight attempt and the retry delay, and re-checks it before the next
//! attempt fires. Dropping the transport future is how cancellation reaches
//! the transport.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Shared {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cloneable handle; every clone observes the same cancellation.
#[derive(Debug, Clone, Default)]
pub struct CallControl {
    shared: Arc<Shared>,
}

impl CallControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent; wakes every pending [`cancelled`](Self::cancelled).
    pub fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::SeqCst);
        self.shared.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.shared.notify.notified();
            tokio::pin!(notified);
            // Register before checking the flag so a concurrent cancel is not missed.
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}
