//! Errors raised at the tracker's orchestration boundary

use thiserror::Error;

/// Failures that stop a battle from being tracked at all
///
/// Per-line problems never surface here; malformed lines are logged and skipped.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported game type: {0}")]
    UnsupportedGameType(String),

    #[error("Invalid tracker config: {0}")]
    InvalidConfig(serde_json::Error),

    #[error("Invalid dex data: {0}")]
    InvalidDexData(serde_json::Error),
}
