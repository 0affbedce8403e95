//! Backoff after a failed price fetch.
//!
//! Capped exponential: `initial * factor^(n - 1)` for the n-th consecutive
//! failure, never above `max`. A factor of 1 gives a fixed delay.

use std::time::Duration;

pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(20);
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(300);
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    pub initial: Duration,
    pub max: Duration,
    pub factor: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial: DEFAULT_INITIAL_BACKOFF,
            max: DEFAULT_MAX_BACKOFF,
            factor: DEFAULT_BACKOFF_FACTOR,
        }
    }
}

impl BackoffPolicy {
    pub fn fixed(delay: Duration) -> Self {
        Self {
            initial: delay,
            max: delay,
            factor: 1.0,
        }
    }

    /// Delay after `failures` consecutive failures (counted from 1).
    pub fn delay_for(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1).min(64) as i32;
        let factor = if self.factor >= 1.0 { self.factor } else { 1.0 };

        let secs = (self.initial.as_secs_f64() * factor.powi(exponent)).min(self.max.as_secs_f64());

        Duration::try_from_secs_f64(secs)
            .unwrap_or(self.max)
            .max(self.initial.min(self.max))
    }
}

/// Consecutive-failure counter driving a `BackoffPolicy`.
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: BackoffPolicy,
    failures: u32,
}

impl Backoff {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            failures: 0,
        }
    }

    /// Count a failure and return how long to wait before retrying.
    pub fn on_failure(&mut self) -> Duration {
        self.failures = self.failures.saturating_add(1);
        self.policy.delay_for(self.failures)
    }

    /// Reset after a success. Returns the length of the streak that ended.
    pub fn on_success(&mut self) -> u32 {
        std::mem::take(&mut self.failures)
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn doubles_until_capped() {
        let p = BackoffPolicy::default();

        let delays: Vec<Duration> = (1..=6).map(|n| p.delay_for(n)).collect();
        assert_eq!(
            delays,
            vec![secs(20), secs(40), secs(80), secs(160), secs(300), secs(300)]
        );
    }

    #[test]
    fn fixed_policy_never_grows() {
        let p = BackoffPolicy::fixed(secs(20));

        for n in [1, 2, 10, u32::MAX] {
            assert_eq!(p.delay_for(n), secs(20));
        }
    }

    #[test]
    fn huge_streaks_stay_bounded() {
        let p = BackoffPolicy {
            initial: secs(1),
            max: secs(600),
            factor: 10.0,
        };

        assert_eq!(p.delay_for(u32::MAX), secs(600));
    }

    #[test]
    fn zeroth_failure_uses_initial_delay() {
        assert_eq!(BackoffPolicy::default().delay_for(0), secs(20));
    }

    #[test]
    fn counter_resets_on_success() {
        let mut b = Backoff::new(BackoffPolicy::default());

        assert_eq!(b.on_failure(), secs(20));
        assert_eq!(b.on_failure(), secs(40));
        assert_eq!(b.failures(), 2);

        assert_eq!(b.on_success(), 2);
        assert_eq!(b.failures(), 0);
        assert_eq!(b.on_failure(), secs(20));
    }
}
