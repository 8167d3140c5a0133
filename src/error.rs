//! Error types for configuration, streaming and rendering.
//!
//! Construction errors are returned synchronously. Everything that can go
//! wrong while a stream is live is reported through
//! [`StreamObserver::on_error`](crate::engine::StreamObserver::on_error)
//! instead, so a producer loop calling `add_chunk` is never interrupted.

use crate::engine::StreamState;

/// Invalid configuration, detected once when the engine is built.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The chunk window must hold at least one chunk.
    #[error("buffer size must be at least 1 (got {0})")]
    InvalidBufferSize(usize),

    /// The advisory chunk size must be at least one byte.
    #[error("chunk size must be at least 1 (got {0})")]
    InvalidChunkSize(usize),

    /// Automatic reconnects need a non-zero delay between attempts.
    #[error("retry delay must be non-zero when auto reconnect is enabled")]
    InvalidRetryDelay,

    /// The configuration text could not be parsed.
    #[error("failed to parse stream config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failure raised while painting the materialized content.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Writing to the terminal failed.
    #[error("terminal write failed: {0}")]
    Io(#[from] std::io::Error),

    /// The paint target is gone (for example a closed pane).
    #[error("render target is closed")]
    Closed,
}

/// Runtime errors surfaced to the host while a stream is running.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// An operation was invoked in a state that does not accept it.
    ///
    /// These are logged and ignored by the engine; they never change state.
    #[error("`{operation}` is not accepted while {state}")]
    Protocol {
        /// The rejected operation.
        operation: &'static str,
        /// The state the engine was in.
        state: StreamState,
    },

    /// The producer or its transport failed.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Automatic reconnects were used up without a healthy stream.
    #[error("gave up after {attempts} reconnect attempts: {last_error}")]
    RetryExhausted {
        /// Number of automatic restarts performed.
        attempts: u32,
        /// The transport failure that ended the last attempt.
        last_error: String,
    },

    /// The renderer adapter failed to paint.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// The other end of a feed channel was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("stream feed is closed")]
pub struct FeedClosed;
