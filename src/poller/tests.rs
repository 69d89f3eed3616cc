//! Poller Tests
//!
//! All timing tests run on a paused clock, so durations are exact.

#[cfg(test)]
mod tests {
    use crate::poller::*;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// A query that fails `failures` times, then returns the attempt number
    fn flaky_query(
        calls: Arc<AtomicU32>,
        failures: u32,
    ) -> impl FnMut() -> std::future::Ready<Result<u32, String>> {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= failures {
                std::future::ready(Err(format!("receipt not found (attempt {})", n)))
            } else {
                std::future::ready(Ok(n))
            }
        }
    }

    // === Config ===

    #[test]
    fn test_zero_config_uses_defaults() {
        let config = PollConfig::new(Duration::ZERO, Duration::ZERO);
        assert_eq!(config.interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(config.timeout, DEFAULT_POLL_TIMEOUT);
        assert_eq!(config, PollConfig::default());

        let partial = PollConfig::default().with_interval(ms(250)).with_timeout(Duration::ZERO);
        assert_eq!(partial.interval, ms(250));
        assert_eq!(partial.timeout, DEFAULT_POLL_TIMEOUT);
    }

    #[test]
    fn test_poller_normalizes_config() {
        let poller = ReceiptPoller::new(PollConfig {
            interval: Duration::ZERO,
            timeout: ms(500),
        });
        assert_eq!(poller.config().interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(poller.config().timeout, ms(500));
    }

    // === State Machine ===

    #[test]
    fn test_state_transitions() {
        assert!(PollState::Idle.can_transition_to(PollState::Polling));
        assert!(!PollState::Idle.can_transition_to(PollState::Succeeded));
        assert!(PollState::Polling.can_transition_to(PollState::Succeeded));
        assert!(PollState::Polling.can_transition_to(PollState::TimedOut));
        assert!(PollState::Polling.can_transition_to(PollState::Cancelled));
        assert!(!PollState::Succeeded.can_transition_to(PollState::Polling));
        assert!(!PollState::Cancelled.can_transition_to(PollState::TimedOut));

        assert!(!PollState::Polling.is_terminal());
        assert!(PollState::TimedOut.is_terminal());
    }

    #[test]
    fn test_outcome_into_result() {
        let ok: PollOutcome<u8> = PollOutcome::Success {
            value: 7,
            attempts: 2,
            elapsed: ms(10),
        };
        assert_eq!(ok.state(), PollState::Succeeded);
        assert_eq!(ok.into_result(), Ok(7));

        let timed_out: PollOutcome<u8> = PollOutcome::TimedOut {
            attempts: 4,
            elapsed: ms(50),
        };
        let err = timed_out.into_result().unwrap_err();
        assert_eq!(err.attempts(), 4);
        assert!(err.to_string().contains("Timed out after 4 attempts"));
    }

    // === Polling ===

    #[tokio::test(start_paused = true)]
    async fn test_immediate_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let outcome = poll_until_ready(
            flaky_query(calls.clone(), 0),
            PollConfig::default(),
            CancelSignal::never(),
        )
        .await;

        assert_eq!(outcome.attempts(), 1);
        assert_eq!(outcome.elapsed(), Duration::ZERO);
        assert_eq!(outcome.into_result(), Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_third_attempt_stops_polling() {
        let calls = Arc::new(AtomicU32::new(0));
        let outcome = poll_until_ready(
            flaky_query(calls.clone(), 2),
            PollConfig::new(ms(10), ms(1000)),
            CancelSignal::never(),
        )
        .await;

        match outcome {
            PollOutcome::Success {
                value,
                attempts,
                elapsed,
            } => {
                assert_eq!(value, 3);
                assert_eq!(attempts, 3);
                assert_eq!(elapsed, ms(20));
            }
            other => panic!("expected success, got {:?}", other),
        }

        tokio::time::sleep(ms(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_and_releases_timers() {
        let calls = Arc::new(AtomicU32::new(0));
        let outcome = poll_until_ready(
            flaky_query(calls.clone(), u32::MAX),
            PollConfig::new(ms(10), ms(50)),
            CancelSignal::never(),
        )
        .await;

        match outcome {
            PollOutcome::TimedOut { attempts, elapsed } => {
                assert!(elapsed >= ms(50), "elapsed {:?}", elapsed);
                assert!(elapsed < ms(60), "elapsed {:?}", elapsed);
                assert!(attempts >= 4, "attempts {}", attempts);
                assert_eq!(attempts, calls.load(Ordering::SeqCst));
            }
            other => panic!("expected timeout, got {:?}", other),
        }

        let seen = calls.load(Ordering::SeqCst);
        tokio::time::sleep(ms(200)).await;
        assert_eq!(calls.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_waiting() {
        let calls = Arc::new(AtomicU32::new(0));
        let (handle, signal) = cancellation();

        tokio::spawn(async move {
            tokio::time::sleep(ms(25)).await;
            handle.cancel();
        });

        let outcome = poll_until_ready(
            flaky_query(calls.clone(), u32::MAX),
            PollConfig::new(ms(10), ms(60_000)),
            signal,
        )
        .await;

        match outcome {
            PollOutcome::Cancelled { attempts, elapsed } => {
                assert!(elapsed >= ms(25), "elapsed {:?}", elapsed);
                assert!(elapsed < ms(35), "elapsed {:?}", elapsed);
                assert!(attempts >= 1);
                assert_eq!(attempts, calls.load(Ordering::SeqCst));
            }
            other => panic!("expected cancellation, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_start_makes_no_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let (handle, signal) = cancellation();
        handle.cancel();

        let outcome = poll_until_ready(
            flaky_query(calls.clone(), 0),
            PollConfig::default(),
            signal,
        )
        .await;

        assert_eq!(outcome.state(), PollState::Cancelled);
        assert_eq!(outcome.attempts(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handle_does_not_cancel() {
        let calls = Arc::new(AtomicU32::new(0));
        let (handle, signal) = cancellation();
        drop(handle);

        let outcome = poll_until_ready(
            flaky_query(calls, u32::MAX),
            PollConfig::new(ms(10), ms(30)),
            signal,
        )
        .await;

        assert_eq!(outcome.state(), PollState::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_queries_never_overlap() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));
        let calls = Arc::new(AtomicU32::new(0));

        let query = {
            let in_flight = in_flight.clone();
            let max_in_flight = max_in_flight.clone();
            let calls = calls.clone();
            move || {
                let in_flight = in_flight.clone();
                let max_in_flight = max_in_flight.clone();
                let calls = calls.clone();
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_in_flight.fetch_max(now, Ordering::SeqCst);
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(ms(25)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Err::<(), _>("pending")
                }
            }
        };

        let outcome =
            poll_until_ready(query, PollConfig::new(ms(10), ms(200)), CancelSignal::never()).await;

        assert_eq!(outcome.state(), PollState::TimedOut);
        assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
        // Each attempt takes 25ms, so at most one per 25ms fits before the deadline
        assert!(calls.load(Ordering::SeqCst) <= 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_query_longer_than_timeout() {
        let query = || async {
            tokio::time::sleep(ms(100)).await;
            Err::<(), _>("slow")
        };

        let outcome =
            poll_until_ready(query, PollConfig::new(ms(10), ms(50)), CancelSignal::never()).await;

        assert_eq!(outcome.state(), PollState::TimedOut);
        assert_eq!(outcome.attempts(), 1);
        assert_eq!(outcome.elapsed(), ms(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_timeout_still_cancels() {
        let calls = Arc::new(AtomicU32::new(0));
        let (handle, signal) = cancellation();

        tokio::spawn(async move {
            tokio::time::sleep(ms(30)).await;
            handle.cancel();
        });

        let outcome = poll_until_ready(
            flaky_query(calls.clone(), u32::MAX),
            PollConfig::new(ms(10), Duration::MAX),
            signal,
        )
        .await;

        assert_eq!(outcome.state(), PollState::Cancelled);
        assert!(outcome.attempts() >= 3);
        assert_eq!(outcome.attempts(), calls.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_interval_waits_for_deadline() {
        let calls = Arc::new(AtomicU32::new(0));

        let outcome = poll_until_ready(
            flaky_query(calls.clone(), u32::MAX),
            PollConfig::new(Duration::MAX, ms(50)),
            CancelSignal::never(),
        )
        .await;

        assert_eq!(outcome.state(), PollState::TimedOut);
        assert_eq!(outcome.attempts(), 1);
        assert_eq!(outcome.elapsed(), ms(50));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
