//! Error types for Pounce
//!
//! Everything here surfaces at construction or configuration time. The
//! per-frame paths (tick, hit test, draw) never fail.

use thiserror::Error;

/// The main error type for Pounce
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown play mode: {0:?}")]
    InvalidMode(String),

    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("No compatible GPU adapter: {0}")]
    Adapter(String),

    #[error("Device request failed: {0}")]
    Device(String),
}

/// Result type alias using Pounce's Error
pub type Result<T> = std::result::Result<T, Error>;
