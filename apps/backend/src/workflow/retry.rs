//! Per-step retry with capped exponential backoff, jitter and a per-attempt
//! timeout.

use std::future::Future;
use std::time::Duration;

use rand::random;
use tracing::{debug, warn};

use crate::config::WorkflowConfig;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::workflow::run::WorkflowState;

const JITTER_PERCENT: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub step_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&WorkflowConfig::default())
    }
}

/// Final result of a step plus how many attempts it took.
#[derive(Debug)]
pub struct Attempted<T> {
    pub result: Result<T, DomainError>,
    pub attempts: u32,
}

impl RetryPolicy {
    pub fn from_config(cfg: &WorkflowConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts.max(1),
            base_delay: Duration::from_millis(cfg.retry_base_ms),
            max_delay: Duration::from_millis(cfg.retry_max_ms),
            step_timeout: Duration::from_millis(cfg.step_timeout_ms),
        }
    }

    /// No sleeping between attempts; for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            step_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_step_timeout(mut self, step_timeout: Duration) -> Self {
        self.step_timeout = step_timeout;
        self
    }

    /// Delay before retrying after the `attempt`-th failure (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }
        let exp = attempt.saturating_sub(1).min(16);
        let base = self.base_delay.as_secs_f64() * f64::from(1u32 << exp);
        let capped = base.min(self.max_delay.as_secs_f64());
        let jitter = (random::<f64>() * 2.0 - 1.0) * capped * JITTER_PERCENT;
        Duration::from_secs_f64((capped + jitter).max(0.0))
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget runs out. Each attempt is bounded by `step_timeout`.
    pub async fn run<T, F, Fut>(&self, step: WorkflowState, mut op: F) -> Attempted<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let result = match tokio::time::timeout(self.step_timeout, op(attempt)).await {
                Ok(res) => res,
                Err(_) => Err(DomainError::infra(
                    InfraErrorKind::Timeout,
                    format!(
                        "step {step} timed out after {}ms",
                        self.step_timeout.as_millis()
                    ),
                )),
            };

            match result {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(%step, attempt, "step succeeded after retry");
                    }
                    return Attempted {
                        result: Ok(value),
                        attempts: attempt,
                    };
                }
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.backoff(attempt);
                    warn!(
                        %step,
                        attempt,
                        max_attempts = self.max_attempts,
                        retry_delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "step failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    return Attempted {
                        result: Err(err),
                        attempts: attempt,
                    };
                }
            }
        }
    }
}
