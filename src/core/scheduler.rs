//! Periodic recomputation of the live snapshot while a session is open.

use crate::core::clock::Clock;
use crate::core::tracker::{AttendanceTracker, TickOutcome};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Shortest accepted period; anything below is raised to it.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to the repeating tick task.
///
/// The task stops on its own when the session leaves CheckedIn/OnBreak, after
/// `max_ticks` publications, or when `stop()` is called. Dropping the handle
/// stops it too.
pub struct TickScheduler {
    cancel: CancellationToken,
    handle: Option<JoinHandle<usize>>,
    /// Waits for a tick in progress to release the tracker lock.
    fence: Box<dyn Fn() + Send + Sync>,
}

impl TickScheduler {
    /// Must be called from within a tokio runtime.
    pub fn spawn<C: Clock + 'static>(tracker: AttendanceTracker<C>, period: Duration) -> Self {
        Self::spawn_bounded(tracker, period, None)
    }

    pub fn spawn_bounded<C: Clock + 'static>(
        tracker: AttendanceTracker<C>,
        period: Duration,
        max_ticks: Option<usize>,
    ) -> Self {
        let period = period.max(MIN_TICK_INTERVAL);
        let cancel = CancellationToken::new();
        let fenced = tracker.clone();
        let handle = tokio::spawn(run(tracker, period, max_ticks, cancel.clone()));
        debug!(?period, ?max_ticks, "tick scheduler started");
        Self {
            cancel,
            handle: Some(handle),
            fence: Box::new(move || fenced.fence()),
        }
    }

    /// Token that stops the scheduler when cancelled (e.g. from a Ctrl-C
    /// handler).
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Cancel immediately. No tick publishes after this returns, on any
    /// runtime flavor: a tick already past its cancellation check holds the
    /// tracker lock, and `stop` waits for that lock before returning.
    ///
    /// Must not be called while holding the tracker lock.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
            (self.fence)();
        }
    }

    /// Wait for the task to end by itself; returns how many snapshots it
    /// published.
    pub async fn join(mut self) -> usize {
        let Some(handle) = self.handle.take() else {
            return 0;
        };
        match handle.await {
            Ok(published) => published,
            Err(e) => {
                error!(error = %e, "tick scheduler task failed");
                0
            }
        }
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run<C: Clock>(
    tracker: AttendanceTracker<C>,
    period: Duration,
    max_ticks: Option<usize>,
    cancel: CancellationToken,
) -> usize {
    if max_ticks == Some(0) {
        return 0;
    }

    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut published = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        match tracker.tick(&cancel) {
            TickOutcome::Published(snapshot) => {
                published += 1;
                trace!(
                    status = %snapshot.status,
                    net_working_seconds = snapshot.net_working_seconds,
                    "tick"
                );
                if max_ticks.is_some_and(|max| published >= max) {
                    break;
                }
            }
            TickOutcome::Inactive => {
                debug!("no open session, tick scheduler stopping");
                break;
            }
            TickOutcome::Cancelled => break,
        }
    }

    published
}
