use domain::ReplayError;
use fact_log::FactLogError;
use thiserror::Error;

/// Infrastructure and consistency failures surfaced by the engine.
///
/// Business rejections are not errors - they travel in
/// [`crate::ExecutionOutcome`]. An `EngineError` means the log could not
/// be read or written, or the history could not be interpreted; replay
/// failures in particular must not be converted into ordinary rejections,
/// since they mean the entity cannot be safely served at all.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The fact log failed.
    #[error("Fact log error: {0}")]
    Log(#[from] FactLogError),

    /// The fact history could not be replayed.
    #[error("Replay error: {0}")]
    Replay(#[from] ReplayError),

    /// A fact payload could not be serialized for persistence.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
