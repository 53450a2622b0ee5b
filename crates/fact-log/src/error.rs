use thiserror::Error;

use crate::{EntityId, Sequence};

/// Errors that can occur when interacting with the fact log.
#[derive(Debug, Error)]
pub enum FactLogError {
    /// A sequence conflict occurred when appending facts.
    /// The expected sequence did not match the actual sequence.
    #[error(
        "Sequence conflict for entity {entity_id}: expected sequence {expected}, found {actual}"
    )]
    SequenceConflict {
        entity_id: EntityId,
        expected: Sequence,
        actual: Sequence,
    },

    /// The batch handed to `append` was not a valid single-entity batch.
    #[error("Invalid append batch: {0}")]
    InvalidBatch(String),

    /// A persisted log line could not be decoded back into a typed fact
    /// record. The log cannot be safely replayed past this point.
    #[error("Corrupt fact record at line {line}: {source}")]
    CorruptRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// An I/O error occurred against the durable log.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for fact log operations.
pub type Result<T> = std::result::Result<T, FactLogError>;
