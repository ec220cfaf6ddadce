use std::fmt;
use crate::Core::alloc::{CircularAllocator, Slot};
use crate::Log::backend::FileOutputBackend;
use crate::Log::drainer::SlotDrainer;

/// Debug function for CircularAllocator
///
/// Provides a safe debug representation that shows:
/// - Capacity of the ring
/// - Current claim counter
/// - Number of slots currently in use
///
/// Slot payloads are never dereferenced.
pub fn debug_circular_allocator<T>(allocator: &CircularAllocator<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CircularAllocator")
        .field("capacity", &allocator.capacity())
        .field("claimed_sequence", &allocator.claimed_sequence())
        .field("used", &allocator.get_used_count())
        .finish()
}

/// Debug function for Slot
///
/// Only the claim flag is shown; the payload may be owned by another thread.
pub fn debug_slot<T>(slot: &Slot<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Slot")
        .field("in_use", &slot.is_used())
        .finish_non_exhaustive()
}

/// Debug function for SlotDrainer
///
/// Shows:
/// - Queue depth and capacity
/// - Slot currently being written (if any)
/// - Per-cycle limit
///
/// Uses `try_lock` so formatting never blocks behind a running drain pass.
pub fn debug_slot_drainer(drainer: &SlotDrainer, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut s = f.debug_struct("SlotDrainer");
    match drainer.state.try_lock() {
        Some(state) => {
            s.field("queued", &state.queue.len())
                .field("current_slot", &state.current_slot)
                .field("span_pending", &state.writer.has_pending());
        }
        None => {
            s.field("state", &"<locked>");
        }
    }
    s.field("queue_capacity", &drainer.queue_capacity)
        .field("limit_slots_in_one_cycle", &drainer.limit_slots_in_one_cycle)
        .field("allocator", &*drainer.allocator)
        .finish()
}

/// Debug function for FileOutputBackend
pub fn debug_file_output_backend(backend: &FileOutputBackend, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FileOutputBackend")
        .field("fd", &backend.fd)
        .field("drainer", &backend.drainer)
        .finish_non_exhaustive()
}
