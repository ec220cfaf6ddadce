// Chunked, partial-write tolerant writer over a non-blocking descriptor.

use crate::Core::os::Unistd;
use crate::error::Result;
use std::io;
use std::os::fd::RawFd;

/// Default upper bound of bytes handed to a single `write(2)`.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 2048;

/// Outcome of one [`NonBlockingWriter::flush_into_file`] attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WriteResult {
    /// The staged span has been written completely (or nothing was staged).
    Done,
    /// Bytes remain; call again later.
    WouldBlock,
}

/// Stages one span at a time and writes it with at most one syscall per call.
///
/// The span is copied into an internal buffer whose capacity is reused across
/// spans, so the caller's data does not need to outlive the write.
#[derive(Debug)]
pub struct NonBlockingWriter {
    fd: RawFd,
    max_chunk_size: usize,
    unistd: Box<dyn Unistd>,
    staged: Vec<u8>,
    written: usize,
}

impl NonBlockingWriter {
    pub fn new(fd: RawFd, max_chunk_size: usize, unistd: Box<dyn Unistd>) -> Self {
        Self {
            fd,
            max_chunk_size: max_chunk_size.max(1),
            unistd,
            staged: Vec::with_capacity(max_chunk_size),
            written: 0,
        }
    }

    /// Replace the staged span. Any unwritten remainder of the previous span is dropped.
    pub fn set_span(&mut self, span: &[u8]) {
        self.staged.clear();
        self.staged.extend_from_slice(span);
        self.written = 0;
    }

    /// `true` while part of the staged span is still unwritten.
    pub fn has_pending(&self) -> bool {
        self.written < self.staged.len()
    }

    /// Bytes of the staged span not yet accepted by the kernel.
    pub fn remaining(&self) -> &[u8] {
        &self.staged[self.written..]
    }

    /// Attempt one write of the next chunk of the staged span.
    ///
    /// # Returns
    /// * `Ok(WriteResult::Done)` once the whole span has been written
    /// * `Ok(WriteResult::WouldBlock)` if bytes remain (short write, `EAGAIN`, `EINTR`)
    /// * `Err(Error::Io)` for every other OS error; the span stays staged
    pub fn flush_into_file(&mut self) -> Result<WriteResult> {
        if !self.has_pending() {
            return Ok(WriteResult::Done);
        }

        let end = self.staged.len().min(self.written + self.max_chunk_size);
        let chunk = &self.staged[self.written..end];

        match self.unistd.write(self.fd, chunk) {
            Ok(count) => {
                self.written += count.min(chunk.len());
            }
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {
                return Ok(WriteResult::WouldBlock);
            }
            Err(e) => return Err(e.into()),
        }

        if self.has_pending() {
            Ok(WriteResult::WouldBlock)
        } else {
            Ok(WriteResult::Done)
        }
    }

    pub fn fd(&self) -> RawFd {
        self.fd
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }
}
