//! Pool construction, dispatch, and shutdown coordination.
//!
//! [`WorkerPool`] distributes items across per-worker bounded channels using
//! round-robin scheduling and coordinates shutdown via a shared
//! [`CancellationToken`]: once cancelled, submissions fail fast, the queue
//! senders are dropped (the closure broadcast every worker reacts to), and
//! shutdown joins each worker before returning.

use super::worker::{Handler, drain_errors, worker_loop};
use crate::error::{Error, JobError, Result};
use futures::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Sizing knobs for a [`WorkerPool`].
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of worker tasks consuming from the queue. Must be non-zero.
    pub workers: usize,

    /// Requested number of buffered item slots across the pool.
    ///
    /// Capacity is distributed evenly across the per-worker channels by
    /// rounding up to the next multiple of `workers`, so the effective
    /// total can exceed this value by up to `workers - 1` slots. Every
    /// worker keeps at least one slot, which means a capacity of zero
    /// degrades to the tightest hand-off the runtime offers (one slot per
    /// worker) rather than a true rendezvous, which tokio channels do not
    /// support.
    pub queue_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let workers = num_cpus::get();
        Self {
            workers,
            queue_capacity: workers,
        }
    }
}

/// Outcome of a non-blocking submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The item was queued for processing.
    Accepted,
    /// The target queue was full and the item was discarded.
    Dropped,
}

/// A fixed-size pool of worker tasks draining a bounded queue.
///
/// Items are dispatched round-robin to per-worker bounded channels. The pool
/// owns the only senders, so [`WorkerPool::shutdown`] can close the queue by
/// dropping them: every worker finishes whatever is already buffered, then
/// observes closure and exits. Shutdown is a pure join barrier - when it
/// returns, every accepted item has been processed and no worker task
/// remains live.
pub struct WorkerPool<T> {
    senders: Mutex<Option<Vec<mpsc::Sender<T>>>>,
    next_worker: AtomicUsize,
    shutdown_token: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<T> WorkerPool<T>
where
    T: Send + 'static,
{
    /// Spawns `config.workers` worker tasks plus the error-logging task.
    ///
    /// The handler is shared by every worker and runs inline on the worker
    /// task; it should be quick and must not block for long. Handler errors
    /// are forwarded to the logging task and never stop the pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config.workers` is zero.
    pub fn start<F>(config: PoolConfig, handler: F) -> Result<Self>
    where
        F: Fn(T) -> core::result::Result<(), JobError> + Send + Sync + 'static,
    {
        if config.workers == 0 {
            return Err(Error::InvalidConfig {
                reason: "workers must be greater than 0".to_string(),
            });
        }

        let per_worker = config.queue_capacity.div_ceil(config.workers).max(1);
        let handler: Handler<T> = Arc::new(handler);

        let (errs_tx, errs_rx) = mpsc::channel(config.workers * 2);
        let mut senders = Vec::with_capacity(config.workers);
        let mut tasks = Vec::with_capacity(config.workers + 1);

        for worker_id in 0..config.workers {
            let (tx, rx) = mpsc::channel(per_worker);
            senders.push(tx);
            tasks.push(tokio::spawn(worker_loop(
                worker_id,
                rx,
                Arc::clone(&handler),
                errs_tx.clone(),
            )));
        }

        // Workers now hold the only error senders, so the logging task winds
        // down on its own once the last worker exits.
        drop(errs_tx);
        tasks.push(tokio::spawn(drain_errors(errs_rx)));

        Ok(Self {
            senders: Mutex::new(Some(senders)),
            next_worker: AtomicUsize::new(0),
            shutdown_token: CancellationToken::new(),
            tasks: Mutex::new(tasks),
        })
    }

    /// Submits an item, waiting for queue space if the target is full.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Shutdown has already begun ([`Error::PoolShutdown`]).
    /// - The worker's channel is closed ([`Error::Channel`]).
    pub async fn submit(&self, item: T) -> Result<()> {
        let tx = self.checked_sender()?;
        tx.send(item).await.map_err(|_| Error::Channel {
            context: "worker queue closed".to_string(),
        })
    }

    /// Submits an item without blocking, dropping it if the target is full.
    ///
    /// The accepted/dropped split always accounts for every call: an item is
    /// either queued ([`SubmitOutcome::Accepted`]) or discarded
    /// ([`SubmitOutcome::Dropped`]), never silently lost.
    ///
    /// # Errors
    ///
    /// Same as [`WorkerPool::submit`].
    pub fn try_submit(&self, item: T) -> Result<SubmitOutcome> {
        let tx = self.checked_sender()?;
        match tx.try_send(item) {
            Ok(()) => Ok(SubmitOutcome::Accepted),
            Err(mpsc::error::TrySendError::Full(_)) => Ok(SubmitOutcome::Dropped),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(Error::Channel {
                context: "worker queue closed".to_string(),
            }),
        }
    }

    /// Gracefully shuts down the pool.
    ///
    /// - Cancels the shared [`CancellationToken`] so new submissions fail
    ///   fast.
    /// - Drops every queue sender: the closure propagates to all workers at
    ///   once, and each drains its remaining buffered items before exiting.
    /// - Joins every worker task and then the error-logging task.
    ///
    /// There is no deadline - shutdown blocks until the queue is fully
    /// drained. Calling it a second time is a no-op.
    pub async fn shutdown(&self) -> Result<()> {
        // Phase 1: refuse new work.
        self.shutdown_token.cancel();

        // Phase 2: close the queue. Dropping the senders is the termination
        // broadcast; buffered items are still delivered before any worker
        // observes closure.
        #[cfg(feature = "tracing")]
        tracing::debug!("closing worker queues");
        drop(
            self.senders
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take(),
        );

        // Phase 3: wait for the drain to complete.
        let tasks = std::mem::take(
            &mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner),
        );
        for res in join_all(tasks).await {
            if let Err(_e) = res {
                #[cfg(feature = "tracing")]
                tracing::error!("worker task failed during shutdown: {_e}");
            }
        }

        #[cfg(feature = "tracing")]
        tracing::info!("worker pool shutdown complete");
        Ok(())
    }

    /// Clones the round-robin target's sender, failing fast once shutdown
    /// has begun.
    fn checked_sender(&self) -> Result<mpsc::Sender<T>> {
        if self.shutdown_token.is_cancelled() {
            return Err(Error::PoolShutdown);
        }
        let guard = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        let senders = guard.as_ref().ok_or(Error::PoolShutdown)?;
        let idx = self.next_worker_index(senders.len());
        Ok(senders[idx].clone())
    }

    /// Returns the index of the next worker to receive work (round-robin).
    ///
    /// Uses a relaxed atomic increment to minimize contention.
    fn next_worker_index(&self, len: usize) -> usize {
        self.next_worker.fetch_add(1, Ordering::Relaxed) % len
    }
}
