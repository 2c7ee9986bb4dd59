use std::time::Duration;

use crate::transport::TransportErrorKind;

/// What a finished attempt produced, as seen by a retry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The server answered with a (non-success) status.
    Status(u16),
    /// The send failed before a status was received.
    Transport(TransportErrorKind),
}

/// One finished attempt. `index` is the number of attempts made so far, so
/// the first retry decision sees `index == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestAttempt {
    pub index: u32,
    pub outcome: AttemptOutcome,
}

impl RequestAttempt {
    pub fn status(&self) -> Option<u16> {
        match self.outcome {
            AttemptOutcome::Status(code) => Some(code),
            AttemptOutcome::Transport(_) => None,
        }
    }
}

/// Decides whether another attempt should be made. Implementations may block
/// for a backoff delay before returning `true`.
pub trait RetryBehavior: Send + Sync {
    fn decide(&self, attempt: &RequestAttempt) -> bool;
}

impl<F> RetryBehavior for F
where
    F: Fn(&RequestAttempt) -> bool + Send + Sync,
{
    fn decide(&self, attempt: &RequestAttempt) -> bool {
        self(attempt)
    }
}

/// Built-in retry policies.
///
/// `max_attempts` counts every attempt including the first, so a policy with
/// `max_attempts: 3` sends at most three requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Never retry.
    Never,
    /// Wait a constant delay between attempts.
    FixedDelay { delay: Duration, max_attempts: u32 },
    /// Wait `base_delay * 2^index`, capped at `max_delay`.
    Exponential {
        base_delay: Duration,
        max_delay: Duration,
        max_attempts: u32,
    },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::exponential_default()
    }
}

impl RetryPolicy {
    /// Three attempts, three seconds apart.
    pub const fn linear_thrice() -> Self {
        RetryPolicy::FixedDelay {
            delay: Duration::from_secs(3),
            max_attempts: 3,
        }
    }

    /// Five attempts, backing off from 2s up to a 60s ceiling.
    pub const fn exponential_default() -> Self {
        RetryPolicy::Exponential {
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            max_attempts: 5,
        }
    }

    /// Delay to wait before the attempt following `attempt`, or `None` to stop.
    ///
    /// `attempt` is 1-based: the number of attempts already made.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        match *self {
            RetryPolicy::Never => None,
            RetryPolicy::FixedDelay {
                delay,
                max_attempts,
            } => (attempt < max_attempts).then_some(delay),
            RetryPolicy::Exponential {
                base_delay,
                max_delay,
                max_attempts,
            } => {
                if attempt >= max_attempts {
                    return None;
                }
                let exp = 1u32 << attempt.min(16);
                Some(base_delay.saturating_mul(exp).min(max_delay))
            }
        }
    }
}

impl RetryBehavior for RetryPolicy {
    fn decide(&self, attempt: &RequestAttempt) -> bool {
        match self.delay_for(attempt.index) {
            None => false,
            Some(delay) => {
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
                true
            }
        }
    }
}
