use crate::Counter;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter whose read-modify-write is *not* synchronized.
///
/// Each increment loads the current value, yields the thread, and stores the
/// incremented value back. Two increments that interleave between the load
/// and the store collapse into one - the classic lost-update race. The yield
/// widens that window so the loss is reliably observable under contention.
///
/// The backing cell is still an atomic, so this is well-defined Rust (no
/// torn reads), but the *sequence* load-then-store is racy on purpose. It
/// exists to demonstrate and test the failure mode; use [`LockCounter`] or
/// [`AtomicCounter`] for anything real.
///
/// [`LockCounter`]: crate::LockCounter
/// [`AtomicCounter`]: crate::AtomicCounter
#[derive(Clone, Debug, Default)]
pub struct RacyCounter {
    state: Arc<AtomicU64>,
}

impl RacyCounter {
    /// Creates a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Counter for RacyCounter {
    fn increment(&self) {
        let value = self.state.load(Ordering::Relaxed);
        // Invite the scheduler to interleave another increment here.
        std::thread::yield_now();
        self.state.store(value + 1, Ordering::Relaxed);
    }

    fn get(&self) -> u64 {
        self.state.load(Ordering::Relaxed)
    }
}
