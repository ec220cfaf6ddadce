// Module naming follows project convention (Core = memory + OS plumbing, Log = drain pipeline)
#[allow(non_snake_case)]
pub mod Core {
    pub mod alloc;
    pub use alloc::{CircularAllocator, Slot}; // re-export for stable path
    pub mod os;
    pub use os::{Fcntl, LibcFcntl, LibcUnistd, Unistd};
}

#[allow(non_snake_case)]
pub mod Log {
    pub mod Structs {
        pub mod log_record;
        pub mod slot_handle;
        pub mod verbose_payload;
        pub use log_record::{LogEntry, LogLevel, LogRecord, LoggingIdentifier, DEFAULT_MAX_PAYLOAD_SIZE};
        pub use slot_handle::{RecorderIdentifier, SlotHandle, SlotIndex};
        pub use verbose_payload::VerbosePayload;
    }
    pub mod backend;
    pub mod builder;
    pub mod drainer;
    pub mod message_builder;
    pub mod writer;

    pub use backend::{Backend, FileOutputBackend};
    pub use builder::BackendBuilder;
    pub use drainer::{DrainStatus, SlotDrainer};
    pub use message_builder::{MessageBuilder, TextMessageBuilder};
    pub use writer::{NonBlockingWriter, WriteResult};
}

#[allow(non_snake_case)]
pub mod Debug {
    pub mod StructDebug;
}

pub mod error;

pub use error::{Error, Result};
