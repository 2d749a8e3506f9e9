/**
 * Reconnect Backoff Schedule
 *
 * Deterministic exponential backoff for the show channel: redial number `n`
 * waits `base_delay * 2^n`, so a base of `b` produces the delay sequence
 * `b, 2b, 4b, 8b, ...` with no jitter. The schedule stops once the configured
 * attempt budget is spent; the channel then parks instead of redialing.
 */
use std::time::Duration;

/// Delay before the first redial.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Redial budget before the channel gives up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Exponential backoff schedule for channel reconnects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Delay before the first redial; doubles on every further one
    pub base_delay: Duration,
    /// Number of redials allowed before the channel parks
    pub max_attempts: u32,
}

impl ReconnectPolicy {
    /// Create a schedule with an explicit base delay and attempt budget
    pub fn new(base_delay: Duration, max_attempts: u32) -> Self {
        Self {
            base_delay,
            max_attempts,
        }
    }

    /// Delay before redial number `attempt`, counted from 0
    ///
    /// Saturates instead of overflowing, so an absurd attempt number yields
    /// an effectively infinite delay rather than a panic.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// True once the redial budget is spent
    pub fn is_exhausted(&self, attempt: u32) -> bool {
        attempt >= self.max_attempts
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_double_from_base() {
        let policy = ReconnectPolicy::new(Duration::from_millis(250), 8);
        assert_eq!(policy.delay_for(0), Duration::from_millis(250));
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(2000));
    }

    #[test]
    fn test_budget_exhaustion() {
        let policy = ReconnectPolicy::new(Duration::from_millis(10), 3);
        assert!(!policy.is_exhausted(0));
        assert!(!policy.is_exhausted(2));
        assert!(policy.is_exhausted(3));
        assert!(policy.is_exhausted(4));
    }

    #[test]
    fn test_huge_attempt_saturates_instead_of_panicking() {
        let policy = ReconnectPolicy::new(Duration::from_secs(1), u32::MAX);
        let delay = policy.delay_for(200);
        assert!(delay >= policy.delay_for(30));
    }
}
