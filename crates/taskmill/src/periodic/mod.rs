//! Periodic background worker with a grace-bounded stop handshake.
//!
//! [`PeriodicWorker`] runs an action on a fixed interval, at most one
//! invocation in flight. Stopping is a two-phase protocol: send a stop
//! request, then wait for the loop's acknowledgment up to a configurable
//! grace period. The stop is best-effort by design - it cannot interrupt an
//! action that is already running, only report that the deadline passed.


use crate::error::JobError;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior, timeout};

/// Timing knobs for a [`PeriodicWorker`].
#[derive(Debug, Clone)]
pub struct PeriodicConfig {
    /// Delay between consecutive action invocations. The first tick fires
    /// one full interval after start.
    pub interval: Duration,

    /// How long [`PeriodicWorker::stop`] waits for the loop to acknowledge
    /// before giving up.
    pub grace: Duration,
}

impl Default for PeriodicConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            grace: Duration::from_secs(15),
        }
    }
}

/// Result of the stop handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The loop acknowledged the stop request and exited.
    Graceful,
    /// The grace period elapsed first. The loop is not force-killed: it will
    /// still exit on its own once the in-flight action returns.
    TimedOut,
}

/// Handle to a supervised background loop running an action on a timer.
///
/// The action runs synchronously on the worker task, so invocations never
/// overlap. Action errors are logged and the loop continues to the next
/// tick; the only terminal transition is [`PeriodicWorker::stop`] (or
/// dropping the handle, which the loop notices through its closed stop
/// channel).
pub struct PeriodicWorker {
    stop_tx: mpsc::Sender<oneshot::Sender<()>>,
    grace: Duration,
    task: JoinHandle<()>,
}

impl PeriodicWorker {
    /// Spawns the timer loop.
    ///
    /// `action` receives the instant the tick fired. Returning an `Err` is
    /// logged and otherwise ignored - it never terminates the worker.
    pub fn start<F>(config: PeriodicConfig, action: F) -> Self
    where
        F: FnMut(Instant) -> core::result::Result<(), JobError> + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel(1);
        let task = tokio::spawn(run_loop(config.interval, stop_rx, action));
        Self {
            stop_tx,
            grace: config.grace,
            task,
        }
    }

    /// Requests a stop and waits up to the grace period for the loop to
    /// acknowledge.
    ///
    /// Best-effort: on [`StopOutcome::TimedOut`] the background task is left
    /// to finish its current action and exit on its own; nothing is
    /// force-killed.
    pub async fn stop(self) -> StopOutcome {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.stop_tx.send(ack_tx).await.is_err() {
            // The loop already exited (it only drops the receiver on the way
            // out), so there is nothing left to wait for.
            let _ = self.task.await;
            return StopOutcome::Graceful;
        }

        match timeout(self.grace, ack_rx).await {
            Ok(Ok(())) => {
                let _ = self.task.await;
                StopOutcome::Graceful
            }
            _ => {
                #[cfg(feature = "tracing")]
                tracing::warn!("periodic worker did not stop within the grace period");
                StopOutcome::TimedOut
            }
        }
    }
}

async fn run_loop<F>(
    interval: Duration,
    mut stop_rx: mpsc::Receiver<oneshot::Sender<()>>,
    mut action: F,
) where
    F: FnMut(Instant) -> core::result::Result<(), JobError> + Send + 'static,
{
    // Fire one full interval after start, like a plain ticker, rather than
    // tokio's tick-immediately default. Ticks missed while an action runs
    // long are dropped, not bursted.
    let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // Stop wins over a tick that became ready at the same moment, so
            // no further action runs once a stop has been requested.
            biased;
            request = stop_rx.recv() => {
                if let Some(ack) = request {
                    let _ = ack.send(());
                }
                // `None` means the handle was dropped without a stop call;
                // exit quietly either way.
                return;
            }
            tick = ticker.tick() => {
                if let Err(_e) = action(tick.into_std()) {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("periodic action failed: {_e}");
                }
            }
        }
    }
}
