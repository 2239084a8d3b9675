//! Exponential-backoff retry for connection attempts.
//!
//! MongoDB tends to come up after the API container in local compose setups,
//! so the connectors retry with doubling delays instead of failing the boot.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff policy for connection attempts. The delay doubles after every
/// failure, capped at `max_delay_ms`, with jitter so restarting replicas do
/// not hammer the server in lockstep.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the initial attempt
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Run `operation` until it succeeds or the retry budget is spent, sleeping
/// between attempts per `config`. The last error is returned unchanged.
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut failures = 0;
    let mut delay_ms = config.initial_delay_ms;

    loop {
        match operation().await {
            Ok(value) => {
                if failures > 0 {
                    debug!("Connection established after {} retries", failures);
                }
                return Ok(value);
            }
            Err(e) => {
                failures += 1;
                if failures > config.max_retries {
                    warn!("Giving up after {} attempts: {}", failures, e);
                    return Err(e);
                }

                let wait = jitter(delay_ms);
                debug!(
                    "Attempt {}/{} failed: {}. Retrying in {}ms",
                    failures,
                    config.max_retries + 1,
                    e,
                    wait
                );
                tokio::time::sleep(Duration::from_millis(wait)).await;
                delay_ms = (delay_ms * 2).min(config.max_delay_ms);
            }
        }
    }
}

/// Spread a delay between 50% and 100% of its nominal value using the
/// clock's sub-millisecond noise.
fn jitter(delay_ms: u64) -> u64 {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| u64::from(d.subsec_nanos()))
        .unwrap_or(0);
    delay_ms / 2 + nanos % (delay_ms / 2 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_delay_ms: 1,
            max_delay_ms: 2,
        }
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let attempts = AtomicU32::new(0);
        let result: Result<u32, &str> = retry_with_backoff(
            || {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                async move { if n < 2 { Err("down") } else { Ok(n) } }
            },
            fast(3),
        )
        .await;

        assert_eq!(result, Ok(2));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), &str> = retry_with_backoff(
            || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err("down") }
            },
            fast(2),
        )
        .await;

        assert_eq!(result, Err("down"));
        // initial attempt plus two retries
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_jitter_stays_within_half_to_full() {
        for _ in 0..100 {
            let wait = jitter(100);
            assert!((50..=100).contains(&wait));
        }
    }
}
