use crate::Counter;
use std::sync::{Arc, Mutex, PoisonError};

/// A mutex-guarded counter suitable for multi-threaded environments.
///
/// The value lives behind an [`Arc<Mutex<_>>`], so clones share state and the
/// whole read-modify-write happens under the held lock. N concurrent
/// increments always total exactly N.
///
/// ## Recommended When
/// - The guarded state may grow beyond a single integer
/// - You want the serialization to be obvious at the call site
///
/// ## See Also
/// - [`AtomicCounter`]
/// - [`RacyCounter`]
///
/// [`AtomicCounter`]: crate::AtomicCounter
/// [`RacyCounter`]: crate::RacyCounter
#[derive(Clone, Debug, Default)]
pub struct LockCounter {
    state: Arc<Mutex<u64>>,
}

impl LockCounter {
    /// Creates a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Counter for LockCounter {
    fn increment(&self) {
        // A poisoned lock only means some other holder panicked; the integer
        // is still usable.
        let mut value = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *value += 1;
    }

    fn get(&self) -> u64 {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
