//! Orchestration engine for the innkeep event-sourcing core.
//!
//! The engine is the facade over the fact log and the domain registries:
//! it replays state on demand, dispatches commands, and persists the
//! resulting facts. It holds no state of its own between calls beyond the
//! registries, a log handle, and the per-entity execute locks.

pub mod config;
pub mod engine;
pub mod error;
pub mod outcome;

pub use config::EngineConfig;
pub use engine::{Engine, standard_registries};
pub use error::EngineError;
pub use outcome::ExecutionOutcome;
