//! Engine configuration loaded from environment variables.

use std::path::PathBuf;

/// Engine configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `INNKEEP_LOG_PATH` — durable fact log path (default: `"innkeep-facts.log"`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub log_path: PathBuf,
    pub log_level: String,
}

impl EngineConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        Self {
            log_path: std::env::var("INNKEEP_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("innkeep-facts.log")),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Returns a config writing its log under the given path.
    pub fn with_log_path(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            ..Default::default()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("innkeep-facts.log"),
            log_level: "info".to_string(),
        }
    }
}
