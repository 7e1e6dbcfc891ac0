//! Shared counters with and without synchronization.
//!
//! All counters here are explicitly owned values handed into whichever tasks
//! need them - there is no process-global state. [`LockCounter`] and
//! [`AtomicCounter`] serialize concurrent increments exactly;
//! [`RacyCounter`] deliberately leaves its read-modify-write unsynchronized
//! so the lost-update race can be observed and tested.

mod atomic;
mod interface;
mod lock;
mod racy;

pub use atomic::AtomicCounter;
pub use interface::Counter;
pub use lock::LockCounter;
pub use racy::RacyCounter;
