//! # Error Types
//!
//! Custom error types for Pipe Controller using `thiserror`.
//!
//! Protocol-level problems (unknown verbs, bad numbers, unknown buttons) are
//! never errors; they are absorbed by the parser. Only channel setup and
//! configuration failures surface here.

use thiserror::Error;

/// Main error type for Pipe Controller
#[derive(Debug, Error)]
pub enum PipeError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Channel discovery failed for a directory or a fixed pipe
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Report recorder could not serialize a record
    #[error("Recorder error: {0}")]
    Recorder(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Pipe Controller
pub type Result<T> = std::result::Result<T, PipeError>;
