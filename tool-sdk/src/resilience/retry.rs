//! Retry with exponential backoff
//!
//! Runs a fallible async operation up to a fixed number of attempts, sleeping
//! `initial_interval * multiplier^i` between them. The defaults give three
//! attempts separated by 0.5s and 1s.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use backoff::{backoff::Backoff, ExponentialBackoff};

use crate::error::{Result, ServiceError};

/// Which failures earn another attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOn {
    /// Every error is retried until attempts run out
    AnyError,
    /// Only errors reporting [`ServiceError::is_retryable`]
    TransientOnly,
}

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,

    /// Delay after the first failure
    pub initial_interval: Duration,

    /// Upper bound on a single delay
    pub max_interval: Duration,

    /// Multiplier for backoff between retries
    pub multiplier: f64,

    /// Jitter applied to each delay (0.0 disables it)
    pub randomization_factor: f64,

    /// Maximum total time to spend retrying
    pub max_elapsed_time: Option<Duration>,

    pub retry_on: RetryOn,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(60),
            multiplier: 2.0,
            randomization_factor: 0.0,
            max_elapsed_time: None,
            retry_on: RetryOn::AnyError,
        }
    }
}

impl RetryConfig {
    /// Retry only transient failures, keeping the other settings
    pub fn transient_only(mut self) -> Self {
        self.retry_on = RetryOn::TransientOnly;
        self
    }
}

impl fmt::Display for RetryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RetryConfig {{ max_attempts: {}, initial_interval: {:?}, multiplier: {}, retry_on: {:?} }}",
            self.max_attempts, self.initial_interval, self.multiplier, self.retry_on
        )
    }
}

/// Executor for retry operations with exponential backoff
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Execute a fallible operation with retries according to the configuration.
    ///
    /// The operation is invoked afresh for every attempt. When attempts are
    /// exhausted the error from the final attempt is returned with the
    /// attempt count recorded in its context.
    pub async fn execute<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut backoff = self.backoff();
        let mut attempt = 1;

        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if attempt >= max_attempts || !self.should_retry(&err) {
                return Err(if attempt > 1 {
                    err.with_context_value("attempts", attempt)
                } else {
                    err
                });
            }

            let delay = match backoff.next_backoff() {
                Some(delay) => delay,
                None => return Err(err.with_context_value("attempts", attempt)),
            };

            log::warn!(
                "Operation failed, retrying in {:?} (attempt {}/{}): {}",
                delay,
                attempt,
                max_attempts,
                err
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    fn backoff(&self) -> ExponentialBackoff {
        let mut backoff = ExponentialBackoff {
            current_interval: self.config.initial_interval,
            initial_interval: self.config.initial_interval,
            max_interval: self.config.max_interval,
            multiplier: self.config.multiplier,
            randomization_factor: self.config.randomization_factor,
            max_elapsed_time: self.config.max_elapsed_time,
            ..ExponentialBackoff::default()
        };
        backoff.reset();
        backoff
    }

    fn should_retry(&self, error: &ServiceError) -> bool {
        match self.config.retry_on {
            RetryOn::AnyError => true,
            RetryOn::TransientOnly => error.is_retryable(),
        }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}
