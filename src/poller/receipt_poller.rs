//! Receipt Poller
//!
//! Runs an injected query on a fixed cadence until it succeeds, the
//! deadline passes, or cancellation is requested. Attempts never overlap:
//! the next tick is only awaited once the previous query has returned.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};

use super::cancel::CancelSignal;
use super::{PollConfig, PollOutcome, PollState};
use crate::{log_debug, log_info, log_warn};

const LOG_MODULE: &str = "poller";

/// Longest wait the timers are armed for. Larger intervals and timeouts
/// are clamped so instant arithmetic cannot overflow.
const MAX_WAIT: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Single-use polling state machine
#[derive(Debug)]
pub struct ReceiptPoller {
    config: PollConfig,
    // Internal guard for transitions; callers read the terminal state from `PollOutcome`.
    state: PollState,
}

impl ReceiptPoller {
    pub fn new(config: PollConfig) -> Self {
        Self {
            config: config.normalized(),
            state: PollState::Idle,
        }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Poll `query` until it returns `Ok`.
    ///
    /// The first attempt runs immediately. Later attempts run one interval
    /// apart, measured from the start of the call. Query errors are treated
    /// as "not yet" and retried. The deadline and `cancel` are observed
    /// between attempts; an in-flight query is never interrupted.
    pub async fn run<T, E, F, Fut>(mut self, mut query: F, mut cancel: CancelSignal) -> PollOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let started = Instant::now();
        self.transition(PollState::Polling);

        if cancel.is_cancelled() {
            return self.cancelled(0, started);
        }

        let mut attempts: u32 = 1;
        match query().await {
            Ok(value) => return self.succeeded(value, attempts, started),
            Err(e) => log_debug!(LOG_MODULE, "Attempt failed", attempt = attempts, error = e),
        }

        let interval = self.config.interval.min(MAX_WAIT);
        let deadline = sleep_until(started + self.config.timeout.min(MAX_WAIT));
        tokio::pin!(deadline);

        let mut ticker = interval_at(started + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => return self.cancelled(attempts, started),

                _ = &mut deadline => return self.timed_out(attempts, started),

                _ = ticker.tick() => {
                    attempts = attempts.saturating_add(1);
                    match query().await {
                        Ok(value) => return self.succeeded(value, attempts, started),
                        Err(e) => log_debug!(LOG_MODULE, "Attempt failed", attempt = attempts, error = e),
                    }
                }
            }
        }
    }

    fn transition(&mut self, next: PollState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid poll transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }

    fn succeeded<T>(mut self, value: T, attempts: u32, started: Instant) -> PollOutcome<T> {
        self.transition(PollState::Succeeded);
        let elapsed = started.elapsed();
        log_debug!(LOG_MODULE, "Query succeeded", attempts = attempts, elapsed_ms = elapsed.as_millis());
        PollOutcome::Success {
            value,
            attempts,
            elapsed,
        }
    }

    fn timed_out<T>(mut self, attempts: u32, started: Instant) -> PollOutcome<T> {
        self.transition(PollState::TimedOut);
        let elapsed = started.elapsed();
        log_warn!(LOG_MODULE, "Polling timed out", attempts = attempts, elapsed_ms = elapsed.as_millis());
        PollOutcome::TimedOut { attempts, elapsed }
    }

    fn cancelled<T>(mut self, attempts: u32, started: Instant) -> PollOutcome<T> {
        self.transition(PollState::Cancelled);
        let elapsed = started.elapsed();
        log_info!(LOG_MODULE, "Polling cancelled", attempts = attempts, elapsed_ms = elapsed.as_millis());
        PollOutcome::Cancelled { attempts, elapsed }
    }
}

/// Poll `query` with `config` until it succeeds, times out, or is cancelled
pub async fn poll_until_ready<T, E, F, Fut>(
    query: F,
    config: PollConfig,
    cancel: CancelSignal,
) -> PollOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    ReceiptPoller::new(config).run(query, cancel).await
}
