//! Error types shared across the crate.
//!
//! The central [`Error`] enum covers the recoverable failure cases of the
//! pool and periodic worker. Per-item processing failures are *not* part of
//! it: a handler or action reports those as a boxed [`JobError`], and they
//! are logged rather than propagated, so one bad item never takes the pool
//! or the loop down.

pub type Result<T> = core::result::Result<T, Error>;

/// Opaque error produced by a pool handler or periodic action.
pub type JobError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified error type for pool and periodic worker operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Internal channel send/receive failure (e.g., a closed queue).
    #[error("channel error: {context}")]
    Channel { context: String },

    /// A submission arrived after shutdown had already begun.
    #[error("pool is shutting down")]
    PoolShutdown,

    /// The requested configuration is unusable.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}
