//! Retry policy for store calls.
//!
//! One policy object wraps the handful of primitive read/write calls at the
//! store boundary. Transient infrastructure failures are retried with
//! exponential backoff; validation and state errors pass straight through.

use std::future::Future;
use std::time::Duration;

use log::{error, warn};

use super::errors::{LedgerError, LedgerResult};

/// Bounded-attempt retry with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    /// Delay before the attempt following `attempt` (1-based).
    fn backoff(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.saturating_mul(1u32 << (attempt - 1).min(16));
        exp.min(self.max_delay)
    }

    /// Run `op`, retrying transient failures up to the attempt budget.
    ///
    /// The operation must be safe to re-issue. Reads are naturally so.
    /// Writes are not: a connection error during commit is ambiguous (the
    /// transaction may or may not have landed), so the Pg store keys every
    /// non-idempotent write with an idempotency UUID journaled in the same
    /// transaction as its effect, and a re-issued attempt replays as a
    /// read. Exhaustion maps to `LedgerError::Unavailable` for the command
    /// layer to report.
    pub async fn run<T, F, Fut>(&self, op_name: &str, mut op: F) -> LedgerResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = LedgerResult<T>>,
    {
        let mut last = None;
        for attempt in 1..=self.max_attempts {
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        warn!("{op_name} succeeded after {} retries", attempt - 1);
                    }
                    return Ok(value);
                }
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    let delay = self.backoff(attempt);
                    warn!(
                        "{op_name} failed (attempt {attempt}/{}), retrying in {delay:?}: {err}",
                        self.max_attempts
                    );
                    last = Some(err);
                    tokio::time::sleep(delay).await;
                }
                Err(err) if err.is_transient() => {
                    error!(
                        "{op_name} failed after {} attempts: {err}",
                        self.max_attempts
                    );
                    return Err(LedgerError::Unavailable {
                        attempts: self.max_attempts,
                        last: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        // Unreachable with max_attempts >= 1; keep the compiler satisfied.
        Err(LedgerError::Unavailable {
            attempts: self.max_attempts,
            last: last.map(|e| e.to_string()).unwrap_or_default(),
        })
    }
}
