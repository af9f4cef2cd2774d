//! Conflict retry policy with jittered exponential backoff.
//!
//! The retry budget for transactional commits lives in the store, not in
//! its callers: a transaction closure is re-run transparently on write
//! conflict until it commits or the budget is exhausted.

use std::time::Duration;

use rand::Rng;

/// Retry policy for transactional commits that hit write conflicts.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of commit attempts (including the first).
    pub max_attempts: u32,

    /// Backoff before the first retry.
    pub initial_backoff: Duration,

    /// Cap on the backoff duration.
    pub max_backoff: Duration,

    /// Multiplier applied to the backoff after each failed attempt.
    pub multiplier: f64,

    /// Jitter factor (0.0 to 1.0) randomizing each backoff.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_secs(1),
            multiplier: 2.0,
            jitter: 0.25,
        }
    }
}

impl RetryPolicy {
    /// Creates a new retry policy builder.
    #[must_use]
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// Creates a policy that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self { max_attempts: 1, ..Default::default() }
    }

    /// Returns the backoff that follows `current`, capped at `max_backoff`.
    pub(crate) fn advance(&self, current: Duration) -> Duration {
        std::cmp::min(
            Duration::from_nanos((current.as_nanos() as f64 * self.multiplier) as u64),
            self.max_backoff,
        )
    }
}

/// Builder for [`RetryPolicy`].
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    max_attempts: Option<u32>,
    initial_backoff: Option<Duration>,
    max_backoff: Option<Duration>,
    multiplier: Option<f64>,
    jitter: Option<f64>,
}

impl RetryPolicyBuilder {
    /// Sets the maximum number of commit attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Sets the initial backoff duration.
    #[must_use]
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = Some(backoff);
        self
    }

    /// Sets the maximum backoff duration.
    #[must_use]
    pub fn with_max_backoff(mut self, backoff: Duration) -> Self {
        self.max_backoff = Some(backoff);
        self
    }

    /// Sets the backoff multiplier.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    /// Sets the jitter factor (0.0 to 1.0).
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = Some(jitter);
        self
    }

    /// Builds the retry policy, falling back to defaults for unset fields.
    #[must_use]
    pub fn build(self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy {
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            initial_backoff: self.initial_backoff.unwrap_or(defaults.initial_backoff),
            max_backoff: self.max_backoff.unwrap_or(defaults.max_backoff),
            multiplier: self.multiplier.unwrap_or(defaults.multiplier),
            jitter: self.jitter.unwrap_or(defaults.jitter),
        }
    }
}

/// Applies jitter to a duration.
///
/// Jitter adds randomness in the range `[dur * (1 - factor), dur * (1 + factor)]`
/// so contending writers do not retry in lockstep.
pub(crate) fn apply_jitter(dur: Duration, factor: f64) -> Duration {
    if factor <= 0.0 {
        return dur;
    }

    let factor = factor.clamp(0.0, 1.0);
    let mut rng = rand::rng();

    let base_nanos = dur.as_nanos() as f64;
    let min_nanos = base_nanos * (1.0 - factor);
    let max_nanos = base_nanos * (1.0 + factor);

    Duration::from_nanos(rng.random_range(min_nanos..=max_nanos) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_falls_back_to_defaults() {
        let policy = RetryPolicy::builder().with_max_attempts(10).build();
        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.initial_backoff, RetryPolicy::default().initial_backoff);
    }

    #[test]
    fn no_retry_is_single_attempt() {
        assert_eq!(RetryPolicy::no_retry().max_attempts, 1);
    }

    #[test]
    fn advance_is_capped() {
        let policy = RetryPolicy::builder()
            .with_max_backoff(Duration::from_millis(50))
            .with_multiplier(10.0)
            .build();
        let next = policy.advance(Duration::from_millis(20));
        assert_eq!(next, Duration::from_millis(50));
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let base = Duration::from_millis(100);
        for _ in 0..100 {
            let jittered = apply_jitter(base, 0.25);
            assert!(jittered >= Duration::from_millis(75));
            assert!(jittered <= Duration::from_millis(125));
        }
    }

    #[test]
    fn zero_jitter_is_identity() {
        let base = Duration::from_millis(100);
        assert_eq!(apply_jitter(base, 0.0), base);
    }
}
