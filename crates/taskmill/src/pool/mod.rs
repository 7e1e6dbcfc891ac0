//! Bounded worker pool with closure-driven graceful shutdown.
//!
//! A fixed number of long-lived worker tasks consume items from bounded MPSC
//! queues fed in round-robin fashion. Producers either wait for queue space
//! ([`WorkerPool::submit`]) or drop on overflow without blocking
//! ([`WorkerPool::try_submit`]). Shutting down closes the queue - workers
//! drain whatever is already buffered, then exit - and joins every task
//! before returning.
//!
//! Per-item handler failures flow through a dedicated error channel consumed
//! by a logging task; they never halt the erroring worker or its peers.

mod manager;
#[cfg(test)]
mod tests;
mod worker;

pub use manager::{PoolConfig, SubmitOutcome, WorkerPool};
