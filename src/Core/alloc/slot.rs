use std::cell::UnsafeCell;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::{AcqRel, Acquire, Relaxed, Release};

/// A single cell of the circular allocator.
///
/// The payload lives for as long as the ring does. Claiming a slot never
/// resets the payload; whoever claims it overwrites what it needs.
///
/// ### Concurrency Design:
/// - `in_use` goes `false -> true` only through a successful CAS in [`Slot::try_use`].
/// - `in_use` goes `true -> false` only through [`Slot::release`].
/// - The winner of the CAS has exclusive access to `data` until it releases.
pub struct Slot<T> {
    data: UnsafeCell<T>,
    in_use: AtomicBool,
}

// Access to `data` is serialized through the `in_use` claim protocol.
unsafe impl<T: Send> Send for Slot<T> {}
unsafe impl<T: Send> Sync for Slot<T> {}

impl<T> Slot<T> {
    pub fn new(data: T) -> Self {
        Self {
            data: UnsafeCell::new(data),
            in_use: AtomicBool::new(false),
        }
    }

    /// Attempt to claim the slot. Returns `true` if the caller now owns `data`.
    #[inline]
    pub fn try_use(&self) -> bool {
        self.in_use
            .compare_exchange(false, true, AcqRel, Relaxed)
            .is_ok()
    }

    /// Publish the slot as free again.
    #[inline]
    pub fn release(&self) {
        self.in_use.store(false, Release);
    }

    /// Snapshot of the claim flag. May be stale under concurrent access.
    #[inline]
    pub fn is_used(&self) -> bool {
        self.in_use.load(Acquire)
    }

    /// Mutable access to the payload.
    ///
    /// # Safety
    /// Caller must hold a successful [`Slot::try_use`] claim on this slot (or
    /// otherwise be the only party touching it) for as long as the returned
    /// reference lives.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn get_data_ref(&self) -> &mut T {
        &mut *self.data.get()
    }

    /// Exclusive access through `&mut self`, which needs no claim.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }
}
