//! Reconnect bookkeeping.
//!
//! The engine never sleeps. A failure records a deadline; the host's frame
//! loop calls [`StreamEngine::tick`](super::StreamEngine::tick), which
//! restarts the stream once the deadline has passed.

use crate::config::StreamConfig;
use std::time::Duration;

/// Bounded reconnect policy taken from the stream config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Reconnect automatically at all.
    pub enabled: bool,
    /// Automatic restarts allowed before giving up.
    pub max_retries: u32,
    /// Wait before each restart.
    pub delay: Duration,
}

impl From<&StreamConfig> for RetryPolicy {
    fn from(config: &StreamConfig) -> Self {
        Self {
            enabled: config.auto_reconnect,
            max_retries: config.max_retries,
            delay: config.retry_delay,
        }
    }
}

/// What to do after a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// A restart is due at the given clock offset.
    Scheduled(Duration),
    /// The budget is used up.
    Exhausted {
        /// Restarts already performed.
        attempts: u32,
    },
    /// Reconnects are turned off.
    Disabled,
}

/// Attempt counter and pending deadline.
#[derive(Debug, Clone, Default)]
pub(crate) struct RetryState {
    attempts: u32,
    due_at: Option<Duration>,
}

impl RetryState {
    /// Forget attempts and any pending deadline.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Decide whether another restart is allowed and record its deadline.
    pub(crate) fn schedule(&mut self, policy: &RetryPolicy, now: Duration) -> RetryDecision {
        if !policy.enabled {
            return RetryDecision::Disabled;
        }
        if self.attempts >= policy.max_retries {
            self.due_at = None;
            return RetryDecision::Exhausted {
                attempts: self.attempts,
            };
        }
        let at = now + policy.delay;
        self.due_at = Some(at);
        RetryDecision::Scheduled(at)
    }

    /// Consume the deadline if it has passed, counting the attempt.
    pub(crate) fn take_due(&mut self, now: Duration) -> Option<u32> {
        match self.due_at {
            Some(at) if now >= at => {
                self.due_at = None;
                self.attempts += 1;
                Some(self.attempts)
            }
            _ => None,
        }
    }

    /// Drop a pending deadline, keeping the attempt count.
    pub(crate) fn cancel(&mut self) -> bool {
        self.due_at.take().is_some()
    }

    pub(crate) const fn attempts(&self) -> u32 {
        self.attempts
    }

    pub(crate) const fn due_at(&self) -> Option<Duration> {
        self.due_at
    }
}
