//! Explicit retry policy for outbound data-source calls.
//!
//! The policy is a plain value: how many attempts, the exponential backoff
//! schedule, and (through [`Retryable`]) which errors are worth another try.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

/// Errors that know whether repeating the request could succeed.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Exponential backoff retry configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
    /// Maximum backoff cap.
    pub max_delay: Duration,
    /// Multiplier per consecutive failure (typically 2.0).
    pub multiplier: f64,
    /// Add up to 10% random jitter to each delay.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self::immediate(1)
    }

    /// Retry up to `max_attempts` times without sleeping (for tests).
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 1.0,
            jitter: false,
        }
    }

    /// Backoff before retrying after `failed_attempt` (1-based) failed, without jitter.
    pub fn delay_for(&self, failed_attempt: u32) -> Duration {
        let exponent = failed_attempt.saturating_sub(1) as i32;
        let delay_secs = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = delay_secs.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped.max(0.0))
    }

    fn sleep_for(&self, failed_attempt: u32) -> Duration {
        let delay = self.delay_for(failed_attempt);
        if !self.jitter || delay.is_zero() {
            return delay;
        }
        let max_jitter_ms = (delay.as_millis() / 10).max(1) as u64;
        let jitter = rand::thread_rng().gen_range(0..=max_jitter_ms);
        (delay + Duration::from_millis(jitter)).min(self.max_delay)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. The last error is returned unchanged.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        E: Retryable + std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts && e.is_retryable() => {
                    let delay = self.sleep_for(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Transient failure, retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
