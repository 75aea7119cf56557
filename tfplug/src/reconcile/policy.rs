//! Backoff policy for reconcile polling

use std::time::Duration;

use crate::error::{Result, TfplugError};

/// Bounds and backoff shape of one reconcile operation
///
/// `max_elapsed` is always set, so every reconcile finishes in bounded
/// wall-clock time even when `max_attempts` is 0 (unbounded by count).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    /// Delay before the second fetch
    pub initial_delay: Duration,
    /// Factor applied to the delay after every sleep, values below 1 act as 1
    pub backoff_multiplier: f64,
    /// Cap for a single sleep
    pub max_delay: Duration,
    /// Maximum number of fetch calls, 0 means no limit by count
    pub max_attempts: u32,
    /// Hard wall-clock budget for the whole operation
    pub max_elapsed: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(30),
            max_attempts: 8,
            max_elapsed: Duration::from_secs(120),
        }
    }
}

impl PollPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_max_elapsed(mut self, elapsed: Duration) -> Self {
        self.max_elapsed = elapsed;
        self
    }

    /// Rejects policies that could never make progress
    pub fn validate(&self) -> Result<()> {
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(TfplugError::InvalidConfiguration(format!(
                "backoff multiplier must be a finite number >= 1, got {}",
                self.backoff_multiplier
            )));
        }
        if self.max_elapsed.is_zero() {
            return Err(TfplugError::InvalidConfiguration(
                "maximum elapsed time must be greater than zero".to_string(),
            ));
        }
        if self.initial_delay > self.max_delay {
            return Err(TfplugError::InvalidConfiguration(format!(
                "initial delay {:?} exceeds maximum delay {:?}",
                self.initial_delay, self.max_delay
            )));
        }
        Ok(())
    }

    fn multiplier(&self) -> f64 {
        if self.backoff_multiplier.is_finite() && self.backoff_multiplier >= 1.0 {
            self.backoff_multiplier
        } else {
            1.0
        }
    }

    /// Delay following `current`, never above `max_delay`
    pub fn next_delay(&self, current: Duration) -> Duration {
        let scaled = Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier())
            .unwrap_or(self.max_delay);
        scaled.min(self.max_delay)
    }

    /// Infinite sequence of sleep durations between attempts
    pub fn delays(&self) -> Backoff {
        Backoff {
            policy: *self,
            next: self.initial_delay.min(self.max_delay),
        }
    }
}

/// Iterator over the backoff delays of a [`PollPolicy`]
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: PollPolicy,
    next: Duration,
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let current = self.next;
        self.next = self.policy.next_delay(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_values() {
        let policy = PollPolicy::default();
        assert_eq!(policy.initial_delay, Duration::from_secs(1));
        assert_eq!(policy.backoff_multiplier, 2.0);
        assert_eq!(policy.max_delay, Duration::from_secs(30));
        assert_eq!(policy.max_attempts, 8);
        assert_eq!(policy.max_elapsed, Duration::from_secs(120));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn delays_double_until_capped() {
        let policy = PollPolicy::new()
            .with_initial_delay(Duration::from_millis(10))
            .with_max_delay(Duration::from_millis(100));

        let delays: Vec<_> = policy.delays().take(6).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(10),
                Duration::from_millis(20),
                Duration::from_millis(40),
                Duration::from_millis(80),
                Duration::from_millis(100),
                Duration::from_millis(100),
            ]
        );
    }

    #[test]
    fn sub_unit_multiplier_keeps_delay_constant() {
        let policy = PollPolicy::new()
            .with_initial_delay(Duration::from_millis(50))
            .with_backoff_multiplier(0.5);

        assert_eq!(policy.next_delay(Duration::from_millis(50)), Duration::from_millis(50));
        assert!(policy.validate().is_err());
    }

    #[test]
    fn huge_delays_saturate_at_cap() {
        let policy = PollPolicy::new().with_backoff_multiplier(1e300);
        assert_eq!(policy.next_delay(Duration::from_secs(1)), policy.max_delay);
    }

    #[test]
    fn initial_delay_above_cap_is_clamped() {
        let policy = PollPolicy::new()
            .with_initial_delay(Duration::from_secs(60))
            .with_max_delay(Duration::from_secs(5));

        assert_eq!(policy.delays().next(), Some(Duration::from_secs(5)));
        assert!(policy.validate().is_err());
    }

    #[test]
    fn zero_elapsed_budget_is_invalid() {
        let policy = PollPolicy::new().with_max_elapsed(Duration::ZERO);
        assert!(matches!(
            policy.validate(),
            Err(TfplugError::InvalidConfiguration(_))
        ));
    }
}
