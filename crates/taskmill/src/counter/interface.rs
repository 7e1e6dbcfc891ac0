/// A shared counter that can be incremented from many threads or tasks.
///
/// Implementations differ only in how (or whether) they synchronize the
/// read-modify-write: see [`LockCounter`], [`AtomicCounter`], and
/// [`RacyCounter`].
///
/// [`LockCounter`]: crate::LockCounter
/// [`AtomicCounter`]: crate::AtomicCounter
/// [`RacyCounter`]: crate::RacyCounter
pub trait Counter: Send + Sync {
    /// Adds one to the counter.
    fn increment(&self);

    /// Returns the current value.
    fn get(&self) -> u64;
}
