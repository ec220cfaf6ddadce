use super::*;
use std::sync::atomic::Ordering;

/// Getter methods for CircularAllocator
///
/// These expose the private fields of CircularAllocator for debugging and
/// monitoring purposes.
impl<T> CircularAllocator<T> {
    /// Number of slots in the ring. Fixed at construction.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Current value of the claim counter.
    ///
    /// Loaded with relaxed ordering since this is only used for diagnostics.
    pub fn claimed_sequence(&self) -> usize {
        self.claimed_sequence.load(Ordering::Relaxed)
    }

    /// Snapshot of whether slot `index` is claimed. `false` for out-of-range indices.
    pub fn is_slot_used(&self, index: usize) -> bool {
        self.buffer.get(index).is_some_and(Slot::is_used)
    }
}
