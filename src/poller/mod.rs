//! Confirmation Polling
//!
//! A bounded retry loop that keeps invoking an injected query until it
//! succeeds, a deadline passes, or the caller cancels. The poller knows
//! nothing about the transport behind the query.

pub mod cancel;
pub mod receipt_poller;

#[cfg(test)]
mod tests;

pub use cancel::{cancellation, CancelHandle, CancelSignal};
pub use receipt_poller::{poll_until_ready, ReceiptPoller};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Interval between attempts when none is configured
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Overall deadline when none is configured
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(60);

/// Polling cadence and deadline. Zero values fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollConfig {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }.normalized()
    }

    /// Replace unset (zero) values with the defaults
    pub fn normalized(self) -> Self {
        Self {
            interval: if self.interval.is_zero() {
                DEFAULT_POLL_INTERVAL
            } else {
                self.interval
            },
            timeout: if self.timeout.is_zero() {
                DEFAULT_POLL_TIMEOUT
            } else {
                self.timeout
            },
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self.normalized()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.normalized()
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

/// Poller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    Idle,
    Polling,
    Succeeded,
    TimedOut,
    Cancelled,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::TimedOut | Self::Cancelled)
    }

    pub fn can_transition_to(&self, next: PollState) -> bool {
        match self {
            Self::Idle => next == Self::Polling,
            Self::Polling => next.is_terminal(),
            _ => false,
        }
    }
}

/// Result of a single poll invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The query succeeded on attempt `attempts`
    Success {
        value: T,
        attempts: u32,
        elapsed: Duration,
    },
    /// The deadline passed with no successful attempt
    TimedOut { attempts: u32, elapsed: Duration },
    /// The caller cancelled before any attempt succeeded
    Cancelled { attempts: u32, elapsed: Duration },
}

impl<T> PollOutcome<T> {
    /// Number of query invocations made
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. }
            | Self::TimedOut { attempts, .. }
            | Self::Cancelled { attempts, .. } => *attempts,
        }
    }

    /// Time from invocation start to the terminal transition
    pub fn elapsed(&self) -> Duration {
        match self {
            Self::Success { elapsed, .. }
            | Self::TimedOut { elapsed, .. }
            | Self::Cancelled { elapsed, .. } => *elapsed,
        }
    }

    /// Terminal state this outcome corresponds to
    pub fn state(&self) -> PollState {
        match self {
            Self::Success { .. } => PollState::Succeeded,
            Self::TimedOut { .. } => PollState::TimedOut,
            Self::Cancelled { .. } => PollState::Cancelled,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn into_result(self) -> Result<T, PollError> {
        match self {
            Self::Success { value, .. } => Ok(value),
            Self::TimedOut { attempts, elapsed } => Err(PollError::TimedOut { attempts, elapsed }),
            Self::Cancelled { attempts, elapsed } => {
                Err(PollError::Cancelled { attempts, elapsed })
            }
        }
    }
}

/// Terminal polling failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollError {
    #[error("Timed out after {attempts} attempts ({elapsed:?})")]
    TimedOut { attempts: u32, elapsed: Duration },

    #[error("Cancelled after {attempts} attempts ({elapsed:?})")]
    Cancelled { attempts: u32, elapsed: Duration },
}

impl PollError {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::TimedOut { attempts, .. } | Self::Cancelled { attempts, .. } => *attempts,
        }
    }

    pub fn category(&self) -> crate::error::ErrorCategory {
        match self {
            Self::TimedOut { .. } => crate::error::ErrorCategory::TimedOut,
            Self::Cancelled { .. } => crate::error::ErrorCategory::Cancelled,
        }
    }
}
