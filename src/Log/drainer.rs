// Consumer side of the logging ring: queued slots -> spans -> file descriptor.

use crate::error::{Error, Result};
use crate::Core::alloc::CircularAllocator;
use crate::Log::message_builder::MessageBuilder;
use crate::Log::writer::{NonBlockingWriter, WriteResult};
use crate::Log::Structs::{LogRecord, SlotHandle};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Default number of slots finished by one drain pass before it yields.
pub const DEFAULT_LIMIT_SLOTS_IN_ONE_CYCLE: usize = 32;

/// Default capacity of the pending-slot FIFO.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Result of one drain pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrainStatus {
    /// Queue empty and nothing left in flight.
    AllDataProcessed,
    /// The writer would block; the in-flight span is kept for the next pass.
    PartiallyProcessed,
    /// The per-pass slot limit was hit; remaining slots stay queued.
    NumberOfProcessedSlotsExceeded,
}

/// Outcome of pushing the current record's spans through the writer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SpanStatus {
    Depleted,
    WouldBlock,
}

pub(crate) struct DrainState {
    pub(crate) message_builder: Box<dyn MessageBuilder>,
    pub(crate) writer: NonBlockingWriter,
    pub(crate) queue: VecDeque<SlotHandle>,
    pub(crate) current_slot: Option<SlotHandle>,
}

/// Drains flushed slots into the writer, one span at a time.
///
/// ### Concurrency Design:
/// - One mutex covers both [`SlotDrainer::push_back`] and the drain pass, so the
///   drain state machine only ever runs on one thread at a time.
/// - A slot goes back to the allocator only after every span of its record has
///   been written completely.
/// - Slots are written in the order they were pushed.
pub struct SlotDrainer {
    pub(crate) state: Mutex<DrainState>,
    pub(crate) allocator: Arc<CircularAllocator<LogRecord>>,
    pub(crate) limit_slots_in_one_cycle: usize,
    pub(crate) queue_capacity: usize,
}

impl SlotDrainer {
    pub fn new(
        message_builder: Box<dyn MessageBuilder>,
        allocator: Arc<CircularAllocator<LogRecord>>,
        writer: NonBlockingWriter,
        limit_slots_in_one_cycle: usize,
    ) -> Self {
        Self::with_queue_capacity(
            message_builder,
            allocator,
            writer,
            limit_slots_in_one_cycle,
            DEFAULT_QUEUE_CAPACITY,
        )
    }

    pub fn with_queue_capacity(
        message_builder: Box<dyn MessageBuilder>,
        allocator: Arc<CircularAllocator<LogRecord>>,
        writer: NonBlockingWriter,
        limit_slots_in_one_cycle: usize,
        queue_capacity: usize,
    ) -> Self {
        Self {
            state: Mutex::new(DrainState {
                message_builder,
                writer,
                queue: VecDeque::with_capacity(queue_capacity),
                current_slot: None,
            }),
            allocator,
            limit_slots_in_one_cycle,
            queue_capacity,
        }
    }

    /// Queue a filled slot for writing.
    ///
    /// If the queue is full the slot is handed back to the allocator so it is
    /// not leaked, and `Error::QueueFull` is returned.
    pub fn push_back(&self, slot: SlotHandle) -> Result<()> {
        let mut state = self.state.lock();
        if state.queue.len() >= self.queue_capacity {
            drop(state);
            self.allocator
                .release_slot(slot.get_slot_of_selected_recorder() as usize);
            tracing::warn!(
                capacity = self.queue_capacity,
                "drain queue full, dropping log record"
            );
            return Err(Error::QueueFull {
                capacity: self.queue_capacity,
            });
        }
        state.queue.push_back(slot);
        Ok(())
    }

    /// Best-effort drain pass. Write failures are dropped.
    pub fn flush(&self) {
        match self.try_flush_slots() {
            Ok(status) => tracing::trace!(?status, "drain pass finished"),
            Err(e) => tracing::debug!(error = %e, "drain pass failed, records may be lost"),
        }
    }

    /// One drain pass, reporting why it stopped.
    pub fn try_flush_slots(&self) -> Result<DrainStatus> {
        let mut state = self.state.lock();
        let DrainState {
            message_builder,
            writer,
            queue,
            current_slot,
        } = &mut *state;

        let mut processed_slots = 0usize;
        loop {
            if Self::try_flush_spans(message_builder.as_mut(), writer)? == SpanStatus::WouldBlock {
                return Ok(DrainStatus::PartiallyProcessed);
            }

            if let Some(finished) = current_slot.take() {
                self.allocator
                    .release_slot(finished.get_slot_of_selected_recorder() as usize);
            }

            // Checked before popping, so one more slot than the limit is processed.
            if processed_slots > self.limit_slots_in_one_cycle {
                return Ok(DrainStatus::NumberOfProcessedSlotsExceeded);
            }

            let Some(next) = queue.pop_front() else {
                return Ok(DrainStatus::AllDataProcessed);
            };

            let index = next.get_slot_of_selected_recorder() as usize;
            if index >= self.allocator.capacity() {
                tracing::warn!(index, "skipping handle outside of the allocator");
                continue;
            }

            // The producer finished writing before pushing the handle and the
            // mutex orders that write before this read.
            let record = unsafe { self.allocator.get_underlying_buffer_for(index) };
            message_builder.set_next_message(record);
            *current_slot = Some(next);
            processed_slots += 1;
        }
    }

    fn try_flush_spans(
        message_builder: &mut dyn MessageBuilder,
        writer: &mut NonBlockingWriter,
    ) -> Result<SpanStatus> {
        loop {
            if writer.flush_into_file()? == WriteResult::WouldBlock {
                return Ok(SpanStatus::WouldBlock);
            }

            match message_builder.get_next_span() {
                Some(span) => writer.set_span(span),
                None => return Ok(SpanStatus::Depleted),
            }
        }
    }

    /// Number of slots waiting to be drained.
    pub fn queued(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn allocator(&self) -> &Arc<CircularAllocator<LogRecord>> {
        &self.allocator
    }

    pub fn limit_slots_in_one_cycle(&self) -> usize {
        self.limit_slots_in_one_cycle
    }
}

impl Drop for SlotDrainer {
    fn drop(&mut self) {
        // Last attempt; whatever the writer cannot take now is lost.
        self.flush();
    }
}

impl std::fmt::Debug for SlotDrainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::Debug::StructDebug::debug_slot_drainer(self, f)
    }
}
