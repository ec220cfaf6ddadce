use std::io;

/// Errors surfaced by the slot allocator and the drain pipeline.
///
/// Ring exhaustion and would-block writes are not errors; they are reported
/// through `Option::None` and the status enums.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid capacity {capacity}: must be greater than zero")]
    InvalidCapacity { capacity: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("drain queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
