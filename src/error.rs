use thiserror::Error;

/// Why an allocation request could not be placed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum AllocError {
    #[error("block size must be greater than 0, got {requested}")]
    InvalidSize { requested: i64 },

    #[error("block size {requested} exceeds total memory ({capacity})")]
    ExceedsCapacity { requested: usize, capacity: usize },

    #[error("not enough free memory: requested {requested}, available {available}")]
    InsufficientFreeMemory { requested: usize, available: usize },

    #[error("memory too fragmented: requested {requested}, largest gap is {largest_gap}")]
    Fragmented { requested: usize, largest_gap: usize },
}
