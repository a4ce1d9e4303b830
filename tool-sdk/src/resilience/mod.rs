//! Resilience patterns for service clients
//!
//! Currently a single pattern: bounded retry with exponential backoff.
//! Every outbound call in the SDK (and the summarizer's model call in the
//! service) goes through a [`RetryExecutor`].

mod retry;

pub use retry::{RetryConfig, RetryExecutor, RetryOn};
