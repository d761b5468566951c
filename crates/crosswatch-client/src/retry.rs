//! Retry budget and backoff policy for upstream fetches.

use std::time::Duration;

/// Retry discipline applied to every fetch cycle.
///
/// Delays double from `base_delay` on each failed attempt and are capped
/// at `max_delay`. A rate-limit signal additionally forces the wait for
/// that attempt up to `rate_limit_floor`, because providers' rate-limit
/// windows are coarser than ordinary transient-error backoff.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// Total attempts, including the first. At least 1.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
    /// Upper bound on any computed delay.
    pub max_delay: Duration,
    /// Minimum wait after an explicit rate-limit signal.
    pub rate_limit_floor: Duration,
    /// Apply +/- 50% random jitter to non-rate-limited delays.
    pub jitter: bool,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(120),
            rate_limit_floor: Duration::from_secs(60),
            jitter: false,
        }
    }
}

impl FetchPolicy {
    /// Single-attempt policy with no waiting, for offline or test runs.
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            rate_limit_floor: Duration::ZERO,
            jitter: false,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Wait before the attempt following failed attempt number `attempt`
    /// (1-based): `base * 2^(attempt-1)`, capped, with the rate-limit
    /// floor applied after jitter so a throttled wait can never shrink
    /// below it.
    pub fn delay_for_attempt(&self, attempt: u32, rate_limited: bool) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let scaled = self.base_delay.as_secs_f64() * 2f64.powi(exponent.min(31) as i32);
        let capped = scaled.min(self.max_delay.as_secs_f64());
        let mut delay = Duration::from_secs_f64(capped);

        if self.jitter {
            let jitter_ms = (delay.as_millis() as f64 * 0.5) as u64;
            if jitter_ms > 0 {
                let offset = fastrand::u64(0..=jitter_ms * 2) as i64 - jitter_ms as i64;
                let total_ms = delay.as_millis() as i64 + offset;
                delay = Duration::from_millis(total_ms.max(0) as u64);
            }
        }

        if rate_limited && delay < self.rate_limit_floor {
            delay = self.rate_limit_floor;
        }

        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> FetchPolicy {
        FetchPolicy {
            max_attempts: 5,
            base_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(120),
            rate_limit_floor: Duration::from_secs(60),
            jitter: false,
        }
    }

    #[test]
    fn delays_double_per_attempt() {
        let policy = policy();

        assert_eq!(policy.delay_for_attempt(1, false), Duration::from_secs(5));
        assert_eq!(policy.delay_for_attempt(2, false), Duration::from_secs(10));
        assert_eq!(policy.delay_for_attempt(3, false), Duration::from_secs(20));
        assert_eq!(policy.delay_for_attempt(4, false), Duration::from_secs(40));
    }

    #[test]
    fn delays_are_capped() {
        let policy = policy();
        assert_eq!(policy.delay_for_attempt(10, false), Duration::from_secs(120));
    }

    #[test]
    fn rate_limit_floor_overrides_small_delays() {
        let policy = policy();
        assert_eq!(policy.delay_for_attempt(1, true), Duration::from_secs(60));
        // Once the exponential wait exceeds the floor it is kept as-is.
        assert_eq!(policy.delay_for_attempt(5, true), Duration::from_secs(80));
    }

    #[test]
    fn jitter_stays_within_half_band() {
        let policy = FetchPolicy {
            jitter: true,
            ..policy()
        };

        for _ in 0..20 {
            let delay = policy.delay_for_attempt(2, false).as_millis() as f64;
            assert!(delay >= 10_000.0 * 0.49, "delay {delay} below jitter band");
            assert!(delay <= 10_000.0 * 1.51, "delay {delay} above jitter band");
        }
    }

    #[test]
    fn jitter_never_undercuts_rate_limit_floor() {
        let policy = FetchPolicy {
            jitter: true,
            ..policy()
        };

        for _ in 0..20 {
            assert!(policy.delay_for_attempt(1, true) >= Duration::from_secs(60));
        }
    }
}
