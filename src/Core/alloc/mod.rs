use crate::error::{Error, Result};
use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicUsize, Ordering};
mod debug;
mod getters;
mod slot;

pub use slot::Slot;

/// Fixed-size ring of [`Slot`]s that producers claim without locking.
///
/// ### Concurrency Design:
/// - **Claim**: every attempt advances the shared `claimed_sequence` counter and
///   tries to CAS the slot at `sequence % capacity`. A claim gives up after one
///   full lap (`capacity` attempts), so it never blocks.
/// - **Release**: a plain release-store on the slot flag.
///
/// The counter is allowed to wrap; `fetch_add` on the atomic wraps around on
/// overflow and the modulo keeps the index in range.
pub struct CircularAllocator<T> {
    claimed_sequence: CachePadded<AtomicUsize>,
    buffer: Box<[Slot<T>]>,
}

impl<T: Clone + Default> CircularAllocator<T> {
    /// Create a ring of `capacity` slots, each seeded with `T::default()`.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_initial_value(capacity, T::default())
    }
}

impl<T: Clone> CircularAllocator<T> {
    /// Create a ring of `capacity` slots, each seeded with a clone of `initial_value`.
    pub fn with_initial_value(capacity: usize, initial_value: T) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity { capacity });
        }

        let buffer: Box<[Slot<T>]> = (0..capacity)
            .map(|_| Slot::new(initial_value.clone()))
            .collect();

        Ok(Self {
            claimed_sequence: CachePadded::new(AtomicUsize::new(0)),
            buffer,
        })
    }
}

impl<T> CircularAllocator<T> {
    /// Claim the next free slot.
    /// Returns the slot index on success, or None if the ring is full.
    pub fn acquire_slot_to_write(&self) -> Option<usize> {
        let capacity = self.buffer.len();

        for _ in 0..capacity {
            let sequence = self.claimed_sequence.fetch_add(1, Ordering::Relaxed);
            let index = sequence % capacity;
            if self.buffer[index].try_use() {
                return Some(index);
            }
        }

        None
    }

    /// Mutable access to the payload of slot `index`.
    ///
    /// # Safety
    /// Caller must hold the claim on `index` returned by
    /// [`CircularAllocator::acquire_slot_to_write`] and must not create a second
    /// live reference to the same slot.
    ///
    /// # Panics
    /// Panics if `index >= capacity`.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn get_underlying_buffer_for(&self, index: usize) -> &mut T {
        self.buffer[index].get_data_ref()
    }

    /// Exclusive access without a claim, available when the caller owns the allocator.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.buffer.get_mut(index).map(Slot::get_mut)
    }

    /// Mark slot `index` free. Out-of-range indices are ignored.
    pub fn release_slot(&self, index: usize) {
        if let Some(slot) = self.buffer.get(index) {
            slot.release();
        }
    }

    /// Number of slots currently marked in use.
    ///
    /// Each flag is read independently, so under concurrency this is an
    /// eventually-consistent figure, not an instantaneous count.
    pub fn get_used_count(&self) -> usize {
        self.buffer.iter().filter(|slot| slot.is_used()).count()
    }
}
