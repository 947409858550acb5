//! Bounded retry for quota-limited provider calls.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::error::{DiscoveryError, Result};
use crate::traits::sleeper::Sleeper;

/// How many times to try a rate-limited call and how long to cool down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Fixed wait after each rate-limited attempt
    pub cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            cooldown: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, cooldown: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            cooldown,
        }
    }

    /// Delay before the attempt following `attempt` (1-based).
    pub fn delay_after(&self, _attempt: u32) -> Duration {
        self.cooldown
    }
}

/// Run `op` until it succeeds, fails with a non-quota error, or the policy
/// runs out of attempts.
///
/// Only [`DiscoveryError::RateLimited`] is retried. Any other error is
/// returned immediately. Exhaustion yields
/// [`DiscoveryError::ExtractionExhausted`]. There is no cooldown after the
/// final attempt.
pub async fn retry_rate_limited<T, F, Fut>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    mut op: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(DiscoveryError::RateLimited(message)) => {
                if attempt == max_attempts {
                    warn!(attempt, max_attempts, error = %message, "Quota hit on final attempt");
                    break;
                }
                let delay = policy.delay_after(attempt);
                warn!(
                    attempt,
                    max_attempts,
                    cooldown_secs = delay.as_secs(),
                    "Quota hit, cooling down before retry"
                );
                sleeper.sleep(delay).await;
            }
            Err(other) => return Err(other),
        }
    }

    Err(DiscoveryError::ExtractionExhausted {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::RecordingSleeper;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_after_one_rate_limit() {
        let sleeper = RecordingSleeper::new();
        let calls = AtomicU32::new(0);

        let result = retry_rate_limited(&RetryPolicy::default(), &sleeper, |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 1 {
                    Err(DiscoveryError::RateLimited("429".into()))
                } else {
                    Ok("ok")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(60)]);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let sleeper = RecordingSleeper::new();
        let calls = AtomicU32::new(0);

        let result: Result<()> = retry_rate_limited(&RetryPolicy::default(), &sleeper, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DiscoveryError::RateLimited("quota".into())) }
        })
        .await;

        assert_eq!(result.unwrap_err().kind(), ErrorKind::ExtractionExhausted);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(sleeper.delays().len(), 2);
    }

    #[tokio::test]
    async fn other_errors_are_not_retried() {
        let sleeper = RecordingSleeper::new();
        let calls = AtomicU32::new(0);

        let result: Result<()> = retry_rate_limited(&RetryPolicy::default(), &sleeper, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DiscoveryError::AI("invalid request".into())) }
        })
        .await;

        assert_eq!(result.unwrap_err().kind(), ErrorKind::ExtractionFailed);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }
}
