//! Bounded retry with exponential backoff and jitter.
//!
//! Every network facing call in the pipeline (catalog pages, search lookups,
//! media downloads) goes through a [`RetryExecutor`]. The executor is a plain
//! value: it holds configuration only, so separate operations never share a
//! retry budget.
//!
//! # Delay Calculation
//!
//! ```text
//! delay(n) = backoff_base^n * delay_unit + jitter
//! jitter   = uniform[0, 1) * delay_unit   (when enabled)
//! ```
//!
//! `n` is the number of the attempt that just failed, starting at 1. With the
//! defaults the waits are roughly 2s, 4s, 8s and 16s before the fifth and final
//! attempt. No delay follows the final failure.

use std::{fmt::Display, future::Future, time::Duration};

use rand::Rng;
use tokio::time::sleep;

use crate::{error::AcquireError, warning};

/// Default number of attempts, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default base of the exponential backoff.
pub const DEFAULT_BACKOFF_BASE: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct RetryExecutor {
    max_attempts: u32,
    backoff_base: f64,
    jitter: bool,
    delay_unit: Duration,
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base: DEFAULT_BACKOFF_BASE,
            jitter: true,
            delay_unit: Duration::from_secs(1),
        }
    }
}

impl RetryExecutor {
    pub fn new(max_attempts: u32, backoff_base: f64, jitter: bool) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base: backoff_base.max(0.0),
            jitter,
            ..Self::default()
        }
    }

    /// Scales every delay by `unit` instead of one second.
    pub fn with_delay_unit(mut self, unit: Duration) -> Self {
        self.delay_unit = unit;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Backoff before the next attempt after attempt `attempt` failed,
    /// without jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.delay_unit.as_secs_f64() * self.backoff_base.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    fn delay(&self, attempt: u32) -> Duration {
        let base = self.backoff(attempt);
        if !self.jitter {
            return base;
        }

        let jitter = self.delay_unit.mul_f64(rand::rng().random::<f64>());
        base.saturating_add(jitter)
    }

    /// Runs `op` until it succeeds or the attempt budget is spent.
    ///
    /// `operation` names the call in log lines and in the
    /// [`AcquireError::RetriesExhausted`] error returned after the last
    /// failure.
    pub async fn run<T, E, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, AcquireError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if attempt >= self.max_attempts {
                return Err(AcquireError::RetriesExhausted {
                    operation: operation.to_string(),
                    attempts: attempt,
                    last_error: err.to_string(),
                });
            }

            let delay = self.delay(attempt);
            warning!(
                "Error in {}: {}. Retrying in {:.2} seconds...",
                operation,
                err,
                delay.as_secs_f64()
            );
            sleep(delay).await;
        }
    }
}
