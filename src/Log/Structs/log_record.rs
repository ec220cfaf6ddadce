// The payload stored in every slot of the logging ring.

use super::verbose_payload::VerbosePayload;
use std::fmt;

/// Default upper bound for the serialized argument bytes of one record.
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 255;

/// Four-character identifier used for ECU, application and context ids.
/// Shorter ids are NUL padded, longer ones truncated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LoggingIdentifier {
    data: [u8; 4],
}

impl LoggingIdentifier {
    pub fn new(id: &str) -> Self {
        let mut data = [0u8; 4];
        let bytes = id.as_bytes();
        let len = bytes.len().min(data.len());
        data[..len].copy_from_slice(&bytes[..len]);
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.data
    }
}

impl From<&str> for LoggingIdentifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for LoggingIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self.data.iter().position(|&b| b == 0).unwrap_or(self.data.len());
        f.write_str(&String::from_utf8_lossy(&self.data[..end]))
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    Off = 0,
    Fatal = 1,
    Error = 2,
    Warn = 3,
    #[default]
    Info = 4,
    Debug = 5,
    Verbose = 6,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Fatal => "fatal",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Verbose => "verbose",
        }
    }
}

/// Fixed metadata of a log message plus its serialized arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogEntry {
    pub app_id: LoggingIdentifier,
    pub ctx_id: LoggingIdentifier,
    pub log_level: LogLevel,
    pub num_of_args: u8,
    /// Monotonic timestamp in nanoseconds, filled by the producer.
    pub timestamp_ns: u64,
    pub payload: Vec<u8>,
}

/// One slot's worth of log data.
///
/// `payload` keeps a fixed capacity for the record's whole life. A derived
/// `Clone` of `Vec` only carries the length over, so cloning restores the
/// source's capacity explicitly.
///
/// The verbose view is produced on demand by [`LogRecord::get_verbose_payload`]
/// and borrows `entry.payload`, so it always refers to this record's buffer.
#[derive(Debug, PartialEq, Eq)]
pub struct LogRecord {
    entry: LogEntry,
    max_payload_size: usize,
}

impl LogRecord {
    pub fn new(max_payload_size_bytes: usize) -> Self {
        let mut entry = LogEntry::default();
        entry.payload.reserve_exact(max_payload_size_bytes);
        Self {
            entry,
            max_payload_size: max_payload_size_bytes,
        }
    }

    pub fn get_log_entry(&self) -> &LogEntry {
        &self.entry
    }

    pub fn get_log_entry_mut(&mut self) -> &mut LogEntry {
        &mut self.entry
    }

    pub fn get_verbose_payload(&mut self) -> VerbosePayload<'_> {
        VerbosePayload::new(self.max_payload_size, &mut self.entry.payload)
    }

    /// The payload bound fixed at construction (or taken over from a clone source).
    pub fn max_payload_size(&self) -> usize {
        self.max_payload_size
    }

    /// Clear metadata and payload before reuse. Capacity is kept.
    pub fn reset(&mut self) {
        let payload = &mut self.entry.payload;
        payload.clear();
        let payload = std::mem::take(payload);
        self.entry = LogEntry {
            payload,
            ..LogEntry::default()
        };
    }

    fn restore_capacity(&mut self, max_payload_size: usize) {
        self.max_payload_size = max_payload_size;
        let payload = &mut self.entry.payload;
        payload.shrink_to(max_payload_size);
        let additional = max_payload_size.saturating_sub(payload.len());
        payload.reserve_exact(additional);
    }
}

impl Default for LogRecord {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAYLOAD_SIZE)
    }
}

impl Clone for LogRecord {
    fn clone(&self) -> Self {
        let mut record = Self {
            entry: self.entry.clone(),
            max_payload_size: self.max_payload_size,
        };
        record.restore_capacity(self.max_payload_size);
        record
    }

    fn clone_from(&mut self, source: &Self) {
        // Capture the bound before the entry is overwritten.
        let max_payload_size = source.max_payload_size;
        self.entry.clone_from(&source.entry);
        self.restore_capacity(max_payload_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_is_padded_and_truncated() {
        assert_eq!(LoggingIdentifier::new("AB").as_bytes(), b"AB\0\0");
        assert_eq!(LoggingIdentifier::new("ABCDEF").as_bytes(), b"ABCD");
        assert_eq!(LoggingIdentifier::new("AB").to_string(), "AB");
    }

    #[test]
    fn reset_keeps_capacity_bound() {
        let mut record = LogRecord::new(16);
        record.get_log_entry_mut().num_of_args = 3;
        record.get_verbose_payload().put(b"abc");

        record.reset();

        assert_eq!(record.get_log_entry().num_of_args, 0);
        assert!(record.get_log_entry().payload.is_empty());
        assert!(record.get_log_entry().payload.capacity() >= 16);
        assert_eq!(record.get_verbose_payload().remaining_capacity(), 16);
    }
}
