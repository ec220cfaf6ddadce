// Incremental serialization cursor over a log record's payload buffer.

/// A bounded, append-only view over a byte buffer.
///
/// The view borrows the buffer it writes into, so it can never outlive or
/// point past the record that owns the buffer. Writes beyond `max_size` are
/// truncated, never reallocated.
#[derive(Debug)]
pub struct VerbosePayload<'a> {
    buffer: &'a mut Vec<u8>,
    max_size: usize,
}

impl<'a> VerbosePayload<'a> {
    /// Bind a view to `buffer`, reserving room for `max_size` bytes.
    pub fn new(max_size: usize, buffer: &'a mut Vec<u8>) -> Self {
        let additional = max_size.saturating_sub(buffer.len());
        buffer.reserve_exact(additional);
        Self { buffer, max_size }
    }

    /// Append as much of `data` as fits. Returns the number of bytes stored.
    pub fn put(&mut self, data: &[u8]) -> usize {
        let copy_size = data.len().min(self.remaining_capacity());
        self.buffer.extend_from_slice(&data[..copy_size]);
        copy_size
    }

    /// Hand the free tail of the buffer to `writer` and keep the bytes it reports.
    ///
    /// `writer` receives a zeroed slice of `remaining_capacity()` bytes and
    /// returns how many of them it filled. Reported sizes larger than the
    /// slice are clamped.
    pub fn put_with<F>(&mut self, writer: F) -> usize
    where
        F: FnOnce(&mut [u8]) -> usize,
    {
        let start = self.buffer.len();
        let available = self.remaining_capacity();
        self.buffer.resize(start + available, 0);
        let written = writer(&mut self.buffer[start..]).min(available);
        self.buffer.truncate(start + written);
        written
    }

    /// `true` if `size` more bytes would not fit.
    pub fn will_overflow(&self, size: usize) -> bool {
        size > self.remaining_capacity()
    }

    pub fn remaining_capacity(&self) -> usize {
        self.max_size.saturating_sub(self.buffer.len())
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Bytes written so far.
    pub fn get_span(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// Drop all content, keeping the reserved capacity.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Address of the bound buffer's storage.
    pub fn as_ptr(&self) -> *const u8 {
        self.buffer.as_ptr()
    }
}
