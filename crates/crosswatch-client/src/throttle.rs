//! Shared request throttle for one upstream connection.
//!
//! The provider's rate limit is global, not per symbol, so a single
//! [`Throttle`] is shared by every fetch issued through one client. A
//! parallel caller assigning symbols to workers keeps the same instance;
//! that prevents a concurrent retry storm from hammering the provider.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Quota-based throttle: at most `quota_limit` requests per `quota_window`,
/// spread evenly across the window.
#[derive(Clone)]
pub struct Throttle {
    limiter: Arc<DirectRateLimiter>,
    period: Duration,
}

impl Throttle {
    pub fn new(quota_window: Duration, quota_limit: u32) -> Self {
        let safe_limit = quota_limit.max(1);
        let burst = NonZeroU32::new(safe_limit).expect("safe limit must be non-zero");

        let seconds_per_cell = (quota_window.as_secs_f64() / f64::from(safe_limit)).max(0.001);
        let period = Duration::from_secs_f64(seconds_per_cell);
        let quota = Quota::with_period(period)
            .expect("period is always greater than zero")
            .allow_burst(burst);

        Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
            period,
        }
    }

    /// Try to take one cell of rate budget without waiting. On failure the
    /// suggested retry interval (one quota period) is returned.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        self.limiter.check().map_err(|_| self.period)
    }

    /// Wait until one cell of rate budget is available.
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_burst_up_to_quota() {
        let throttle = Throttle::new(Duration::from_secs(60), 2);

        assert!(throttle.try_acquire().is_ok());
        assert!(throttle.try_acquire().is_ok());
        let wait = throttle.try_acquire().expect_err("third call should be throttled");
        assert_eq!(wait, Duration::from_secs(30));
    }
}
