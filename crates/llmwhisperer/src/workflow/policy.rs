//! Polling cadence and budget.

use std::time::Duration;

use crate::{Error, Result};

/// Default pause between two status polls: 2 seconds.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default polling deadline: 180 seconds.
pub const DEFAULT_POLL_DEADLINE: Duration = Duration::from_secs(180);

/// Budget of a polling loop.
///
/// Polling stops at whichever limit is hit first. At least one of
/// `max_attempts` and `deadline` must be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause between two polls.
    pub interval: Duration,
    /// Largest number of status requests.
    pub max_attempts: Option<u32>,
    /// Time after which polling gives up, measured from the first poll.
    pub deadline: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
            deadline: Some(DEFAULT_POLL_DEADLINE),
        }
    }
}

impl PollPolicy {
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Removes the deadline, leaving `max_attempts` as the only limit.
    #[must_use]
    pub fn without_deadline(mut self) -> Self {
        self.deadline = None;
        self
    }

    /// Rejects budgets that would poll forever or never poll.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts.is_none() && self.deadline.is_none() {
            return Err(Error::invalid_input(
                "poll policy needs max_attempts or a deadline",
            ));
        }

        if self.max_attempts == Some(0) {
            return Err(Error::invalid_input("max_attempts must be greater than 0"));
        }

        Ok(())
    }

    /// Returns `true` once `attempts` polls used up the attempt budget.
    pub(crate) fn attempts_exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }

    /// Pause before the next poll, or `None` when the deadline has passed.
    ///
    /// The last pause is shortened so that the final poll lands on the deadline.
    pub(crate) fn next_delay(&self, elapsed: Duration) -> Option<Duration> {
        match self.deadline {
            Some(deadline) if elapsed >= deadline => None,
            Some(deadline) => Some(self.interval.min(deadline - elapsed)),
            None => Some(self.interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = PollPolicy::default();

        assert_eq!(policy.interval, Duration::from_secs(2));
        assert_eq!(policy.deadline, Some(Duration::from_secs(180)));
        assert!(policy.max_attempts.is_none());
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_unbounded_policy_is_rejected() {
        let policy = PollPolicy::default().without_deadline();
        assert!(policy.validate().is_err());

        let policy = policy.with_max_attempts(0);
        assert!(policy.validate().is_err());

        let policy = policy.with_max_attempts(5);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_last_delay_lands_on_deadline() {
        let policy = PollPolicy::default()
            .with_interval(Duration::from_secs(2))
            .with_deadline(Duration::from_secs(5));

        assert_eq!(policy.next_delay(Duration::ZERO), Some(Duration::from_secs(2)));
        assert_eq!(policy.next_delay(Duration::from_secs(4)), Some(Duration::from_secs(1)));
        assert_eq!(policy.next_delay(Duration::from_secs(5)), None);
    }

    #[test]
    fn test_attempts_exhausted() {
        let policy = PollPolicy::default().with_max_attempts(3);

        assert!(!policy.attempts_exhausted(2));
        assert!(policy.attempts_exhausted(3));
        assert!(!PollPolicy::default().attempts_exhausted(u32::MAX));
    }
}
