use crate::error::JobError;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Handler shared by every worker in a pool.
///
/// Runs once per dequeued item, at most once at a time per worker. An `Err`
/// is reported on the pool's error channel and the worker moves on to the
/// next item.
pub(crate) type Handler<T> = Arc<dyn Fn(T) -> Result<(), JobError> + Send + Sync>;

/// Failure report forwarded from a worker to the pool's logging task.
///
/// The fields are only read when the `tracing` feature is on; the report is
/// still produced and drained either way so worker behavior does not change
/// with the feature set.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) struct ItemError {
    pub worker_id: usize,
    pub source: JobError,
}

/// Worker task responsible for processing queued items.
///
/// Listens on its own bounded channel and runs the shared handler on each
/// item until the channel is closed *and* drained - queue closure is itself
/// the termination signal, so no separate cancellation message is needed.
pub(crate) async fn worker_loop<T>(
    worker_id: usize,
    mut rx: mpsc::Receiver<T>,
    handler: Handler<T>,
    errs: mpsc::Sender<ItemError>,
) {
    #[cfg(feature = "tracing")]
    tracing::trace!("worker {worker_id} started");

    while let Some(item) = rx.recv().await {
        if let Err(source) = handler(item) {
            // The logging task owns the other end; if it is gone there is
            // nowhere left to report to.
            let _ = errs.send(ItemError { worker_id, source }).await;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("worker {worker_id} stopped");
}

/// Logging task that drains worker failure reports.
///
/// Exits once every worker has dropped its sender, which happens as part of
/// pool shutdown.
pub(crate) async fn drain_errors(mut rx: mpsc::Receiver<ItemError>) {
    while let Some(_report) = rx.recv().await {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            worker = _report.worker_id,
            error = %_report.source,
            "item processing failed"
        );
    }
}
