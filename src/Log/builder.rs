use super::{FileOutputBackend, MessageBuilder, TextMessageBuilder};
use crate::error::{Error, Result};
use crate::Core::alloc::CircularAllocator;
use crate::Core::os::{Fcntl, LibcFcntl, LibcUnistd, Unistd};
use crate::Log::drainer::{DEFAULT_LIMIT_SLOTS_IN_ONE_CYCLE, DEFAULT_QUEUE_CAPACITY};
use crate::Log::writer::DEFAULT_MAX_CHUNK_SIZE;
use crate::Log::Structs::{LogRecord, SlotIndex};
use std::fs::OpenOptions;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct BackendBuilder {
    number_of_slots: usize,
    slot_size_bytes: usize,
    limit_slots_in_one_cycle: usize,
    max_chunk_size: usize,
    queue_capacity: usize,
    ecu_id: String,
    message_builder: Option<Box<dyn MessageBuilder>>,
    fcntl: Option<Box<dyn Fcntl>>,
    unistd: Option<Box<dyn Unistd>>,
}

impl Default for BackendBuilder {
    fn default() -> Self {
        Self {
            number_of_slots: 8,
            slot_size_bytes: 2048,
            limit_slots_in_one_cycle: DEFAULT_LIMIT_SLOTS_IN_ONE_CYCLE,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            ecu_id: "ECU1".to_owned(),
            message_builder: None, // TextMessageBuilder
            fcntl: None,           // LibcFcntl
            unistd: None,          // LibcUnistd
        }
    }
}

impl BackendBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_number_of_slots(mut self, slots: usize) -> Self {
        self.number_of_slots = slots;
        self
    }

    pub fn with_slot_size_bytes(mut self, size: usize) -> Self {
        self.slot_size_bytes = size;
        self
    }

    pub fn with_limit_slots_in_one_cycle(mut self, limit: usize) -> Self {
        self.limit_slots_in_one_cycle = limit;
        self
    }

    pub fn with_max_chunk_size(mut self, size: usize) -> Self {
        self.max_chunk_size = size;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_ecu_id(mut self, ecu_id: &str) -> Self {
        self.ecu_id = ecu_id.to_owned();
        self
    }

    pub fn with_message_builder(mut self, builder: Box<dyn MessageBuilder>) -> Self {
        self.message_builder = Some(builder);
        self
    }

    pub fn with_fcntl(mut self, fcntl: Box<dyn Fcntl>) -> Self {
        self.fcntl = Some(fcntl);
        self
    }

    pub fn with_unistd(mut self, unistd: Box<dyn Unistd>) -> Self {
        self.unistd = Some(unistd);
        self
    }

    fn validate(&self) -> Result<()> {
        let max_slots = (SlotIndex::MAX as usize).saturating_add(1);
        if self.number_of_slots == 0 || self.number_of_slots > max_slots {
            return Err(Error::InvalidConfiguration(format!(
                "number_of_slots must be within 1..={max_slots}, got {}",
                self.number_of_slots
            )));
        }
        if self.limit_slots_in_one_cycle == 0 {
            return Err(Error::InvalidConfiguration(
                "limit_slots_in_one_cycle must be greater than zero".to_owned(),
            ));
        }
        if self.max_chunk_size == 0 {
            return Err(Error::InvalidConfiguration(
                "max_chunk_size must be greater than zero".to_owned(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(Error::InvalidConfiguration(
                "queue_capacity must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }

    /// Build a backend writing to `fd`. The descriptor stays owned by the caller.
    pub fn build(self, fd: RawFd) -> Result<FileOutputBackend> {
        self.validate()?;

        let allocator = Arc::new(CircularAllocator::with_initial_value(
            self.number_of_slots,
            LogRecord::new(self.slot_size_bytes),
        )?);
        let message_builder = self.message_builder.unwrap_or_else(|| {
            Box::new(TextMessageBuilder::new(&self.ecu_id, self.slot_size_bytes))
        });
        let fcntl = self.fcntl.unwrap_or_else(|| Box::new(LibcFcntl));
        let unistd = self.unistd.unwrap_or_else(|| Box::new(LibcUnistd));

        tracing::debug!(
            fd,
            slots = self.number_of_slots,
            slot_size = self.slot_size_bytes,
            "file output backend created"
        );

        Ok(FileOutputBackend::new(
            message_builder,
            fd,
            allocator,
            fcntl,
            unistd,
            self.max_chunk_size,
            self.limit_slots_in_one_cycle,
            self.queue_capacity,
        ))
    }

    /// Open (or create) `<directory>/<app_id>.log` in append mode and build a
    /// backend that owns the file.
    pub fn build_for_file(self, directory: &Path, app_id: &str) -> Result<FileOutputBackend> {
        self.validate()?;

        let path = log_file_path(directory, app_id);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .mode(0o644)
            .custom_flags(libc::O_CLOEXEC)
            .open(&path)?;
        let file = OwnedFd::from(file);
        let fd = file.as_raw_fd();
        Ok(self.build(fd)?.with_owned_file(file))
    }
}

/// `<directory>/<app_id>.log`
pub fn log_file_path(directory: &Path, app_id: &str) -> PathBuf {
    directory.join(format!("{app_id}.log"))
}
