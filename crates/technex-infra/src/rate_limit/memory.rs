//! In-memory keyed rate limiter using the governor crate.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::{Clock, DefaultClock};
use governor::middleware::StateInformationMiddleware;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter as GovernorRateLimiter};

use technex_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

type KeyedRateLimiter = GovernorRateLimiter<
    String,
    DefaultKeyedStateStore<String>,
    DefaultClock,
    StateInformationMiddleware,
>;

/// Ceiling and window of one limiter tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::api()
    }
}

impl RateLimitConfig {
    /// General API traffic: 100 per 15 minutes.
    pub fn api() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }

    /// Form submissions: 5 per 15 minutes.
    pub fn form() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(15 * 60),
        }
    }

    /// File uploads: 3 per hour.
    pub fn upload() -> Self {
        Self {
            max_requests: 3,
            window: Duration::from_secs(60 * 60),
        }
    }

    /// Override `defaults` from `<PREFIX>_MAX_REQUESTS` and `<PREFIX>_WINDOW_SECS`.
    pub fn from_env(prefix: &str, defaults: Self) -> Self {
        Self {
            max_requests: std::env::var(format!("{prefix}_MAX_REQUESTS"))
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_requests),
            window: std::env::var(format!("{prefix}_WINDOW_SECS"))
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.window),
        }
    }
}

/// Per-key GCRA limiter. The burst equals the ceiling and each spent request
/// takes a full `window` to come back, so no window ever admits more than
/// `max_requests`: after the ceiling is used up the next request is allowed
/// one window after the first, and the full ceiling returns once a key has
/// been idle for `max_requests` windows.
///
/// Limits are per-process, not shared between instances.
pub struct InMemoryRateLimiter {
    limiter: KeyedRateLimiter,
    clock: DefaultClock,
    config: RateLimitConfig,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Result<Self, RateLimitError> {
        let burst = NonZeroU32::new(config.max_requests)
            .ok_or_else(|| RateLimitError::Backend("max_requests must be positive".into()))?;
        let quota = Quota::with_period(config.window)
            .ok_or_else(|| RateLimitError::Backend("window is too short".into()))?
            .allow_burst(burst);

        let limiter = GovernorRateLimiter::keyed(quota).with_middleware::<StateInformationMiddleware>();

        Ok(Self {
            limiter,
            clock: DefaultClock::default(),
            config,
        })
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.limiter.len()
    }

    fn replenish_interval(&self) -> Duration {
        self.config.window
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        let limit = self.config.max_requests;

        match self.limiter.check_key(&key.to_string()) {
            Ok(snapshot) => {
                let remaining = snapshot.remaining_burst_capacity();
                Ok(RateLimitResult {
                    allowed: true,
                    limit,
                    remaining,
                    reset_after: self.replenish_interval() * (limit - remaining),
                })
            }
            Err(not_until) => {
                let wait = not_until.wait_time_from(self.clock.now());
                tracing::debug!(key, wait_ms = wait.as_millis() as u64, "Rate limit exceeded");
                Ok(RateLimitResult {
                    allowed: false,
                    limit,
                    remaining: 0,
                    reset_after: wait,
                })
            }
        }
    }

    fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny(max_requests: u32, window_ms: u64) -> InMemoryRateLimiter {
        InMemoryRateLimiter::new(RateLimitConfig {
            max_requests,
            window: Duration::from_millis(window_ms),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_ceiling_then_rejection() {
        let limiter = tiny(5, 60_000);

        for expected_remaining in (0..5).rev() {
            let result = limiter.check("10.0.0.1").await.unwrap();
            assert!(result.allowed);
            assert_eq!(result.limit, 5);
            assert_eq!(result.remaining, expected_remaining);
        }

        let sixth = limiter.check("10.0.0.1").await.unwrap();
        assert!(!sixth.allowed);
        assert_eq!(sixth.remaining, 0);
        assert!(sixth.reset_after > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = tiny(1, 60_000);

        assert!(limiter.check("10.0.0.1").await.unwrap().allowed);
        assert!(!limiter.check("10.0.0.1").await.unwrap().allowed);
        assert!(limiter.check("10.0.0.2").await.unwrap().allowed);
        assert_eq!(limiter.tracked_keys(), 2);
    }

    #[tokio::test]
    async fn test_ceiling_holds_for_the_whole_window() {
        let limiter = tiny(5, 1000);

        for _ in 0..5 {
            assert!(limiter.check("client").await.unwrap().allowed);
        }

        tokio::time::sleep(Duration::from_millis(250)).await;
        let early = limiter.check("client").await.unwrap();
        assert!(!early.allowed);
        assert!(early.reset_after > Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_window_elapse_admits_one_more() {
        let limiter = tiny(3, 300);

        for _ in 0..3 {
            assert!(limiter.check("client").await.unwrap().allowed);
        }
        assert!(!limiter.check("client").await.unwrap().allowed);

        tokio::time::sleep(Duration::from_millis(350)).await;

        assert!(limiter.check("client").await.unwrap().allowed);
        assert!(!limiter.check("client").await.unwrap().allowed);
    }

    #[tokio::test]
    async fn test_prune_forgets_recovered_keys() {
        let limiter = tiny(2, 100);
        limiter.check("a").await.unwrap();
        limiter.check("b").await.unwrap();

        tokio::time::sleep(Duration::from_millis(300)).await;
        limiter.prune();

        assert_eq!(limiter.tracked_keys(), 0);
    }

    #[test]
    fn test_zero_ceiling_is_rejected() {
        let result = InMemoryRateLimiter::new(RateLimitConfig {
            max_requests: 0,
            window: Duration::from_secs(60),
        });
        assert!(result.is_err());
    }
}
