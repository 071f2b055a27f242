pub mod config;
pub mod logging;

pub mod client;
pub mod clock;
pub mod codec;
pub mod control;
pub mod dispatch;
pub mod idempotency;
pub mod message;
pub mod retry;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use client::Client;
pub use control::CallControl;
