//! Error definitions for the dial module

use thiserror::Error;

/// Error types for the dial engine
#[derive(Debug, Error)]
pub enum DialError {
    /// The input mode was never configured. The host must refuse to run
    /// rather than fall back to a default mode.
    #[error("input mode is not configured; set `mode` in config.toml")]
    ModeUnset,

    /// A strategy failed to initialize
    #[error("initialization error: {0}")]
    InitializationError(String),

    /// Channel communication failed
    #[error("channel error: {0}")]
    ChannelError(String),

    /// A background task failed or panicked
    #[error("task error: {0}")]
    TaskError(String),
}
