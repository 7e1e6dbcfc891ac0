use crate::Counter;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A lock-free counter backed by a single atomic read-modify-write.
///
/// `fetch_add` makes each increment indivisible, so like [`LockCounter`] the
/// final value is exact under any interleaving - without taking a lock.
///
/// ## Recommended When
/// - The shared state is a simple value like a counter
/// - You want the lowest overhead under contention
///
/// ## See Also
/// - [`LockCounter`]
/// - [`RacyCounter`]
///
/// [`LockCounter`]: crate::LockCounter
/// [`RacyCounter`]: crate::RacyCounter
#[derive(Clone, Debug, Default)]
pub struct AtomicCounter {
    state: Arc<AtomicU64>,
}

impl AtomicCounter {
    /// Creates a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Counter for AtomicCounter {
    fn increment(&self) {
        self.state.fetch_add(1, Ordering::Relaxed);
    }

    fn get(&self) -> u64 {
        self.state.load(Ordering::Relaxed)
    }
}
