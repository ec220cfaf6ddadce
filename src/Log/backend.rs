// Producer-facing API: reserve a slot, fill the record, flush it.

use crate::error::Result;
use crate::Core::alloc::CircularAllocator;
use crate::Core::os::{self, Fcntl, Unistd};
use crate::Log::drainer::{DrainStatus, SlotDrainer};
use crate::Log::message_builder::MessageBuilder;
use crate::Log::writer::NonBlockingWriter;
use crate::Log::Structs::{LogRecord, SlotHandle, SlotIndex};
use std::os::fd::{OwnedFd, RawFd};
use std::sync::Arc;

/// The contract the logging front-end programs against.
pub trait Backend: Send + Sync {
    /// Claim a slot for a new message. `None` means the ring is exhausted.
    fn reserve_slot(&self) -> Option<SlotHandle>;

    /// Hand a filled slot over for writing.
    fn flush_slot(&self, slot: &SlotHandle);

    /// The record behind `slot`.
    ///
    /// # Safety
    /// `slot` must come from [`Backend::reserve_slot`] on this backend and must
    /// not have been passed to [`Backend::flush_slot`] yet. At most one
    /// reference per slot may be alive.
    #[allow(clippy::mut_from_ref)]
    unsafe fn get_log_record(&self, slot: &SlotHandle) -> &mut LogRecord;
}

/// Writes log records to a file descriptor through a [`SlotDrainer`].
///
/// Draining is piggybacked on producer calls: both `reserve_slot` and
/// `flush_slot` run a drain pass first.
pub struct FileOutputBackend {
    // Declared before `_file` so the final drain runs before the descriptor closes.
    pub(crate) drainer: SlotDrainer,
    pub(crate) allocator: Arc<CircularAllocator<LogRecord>>,
    pub(crate) fd: RawFd,
    _file: Option<OwnedFd>,
}

impl FileOutputBackend {
    /// Wire a backend around `fd`.
    ///
    /// `fd` is switched to non-blocking and close-on-exec on a best-effort basis.
    /// The descriptor is borrowed; use [`FileOutputBackend::with_owned_file`] to
    /// hand over ownership.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        message_builder: Box<dyn MessageBuilder>,
        fd: RawFd,
        allocator: Arc<CircularAllocator<LogRecord>>,
        fcntl: Box<dyn Fcntl>,
        unistd: Box<dyn Unistd>,
        max_chunk_size: usize,
        limit_slots_in_one_cycle: usize,
        queue_capacity: usize,
    ) -> Self {
        os::setup_non_blocking_file(fcntl.as_ref(), fd);

        let writer = NonBlockingWriter::new(fd, max_chunk_size, unistd);
        let drainer = SlotDrainer::with_queue_capacity(
            message_builder,
            Arc::clone(&allocator),
            writer,
            limit_slots_in_one_cycle,
            queue_capacity,
        );

        Self {
            drainer,
            allocator,
            fd,
            _file: None,
        }
    }

    /// Keep `file` open for the backend's lifetime and close it after the final drain.
    pub fn with_owned_file(mut self, file: OwnedFd) -> Self {
        self._file = Some(file);
        self
    }

    /// Run one drain pass and report its outcome.
    pub fn try_flush(&self) -> Result<DrainStatus> {
        self.drainer.try_flush_slots()
    }

    pub fn allocator(&self) -> &Arc<CircularAllocator<LogRecord>> {
        &self.allocator
    }

    pub fn fd(&self) -> RawFd {
        self.fd
    }
}

impl Backend for FileOutputBackend {
    fn reserve_slot(&self) -> Option<SlotHandle> {
        self.drainer.flush();

        let index = self.allocator.acquire_slot_to_write()?;
        match SlotIndex::try_from(index) {
            Ok(slot) => Some(SlotHandle::new(slot)),
            Err(_) => {
                self.allocator.release_slot(index);
                None
            }
        }
    }

    fn flush_slot(&self, slot: &SlotHandle) {
        // On overflow the drainer already released the slot and logged it.
        let _ = self.drainer.push_back(*slot);
        self.drainer.flush();
    }

    unsafe fn get_log_record(&self, slot: &SlotHandle) -> &mut LogRecord {
        self.allocator
            .get_underlying_buffer_for(slot.get_slot_of_selected_recorder() as usize)
    }
}

impl std::fmt::Debug for FileOutputBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::Debug::StructDebug::debug_file_output_backend(self, f)
    }
}
