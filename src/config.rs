//! Stream configuration, validated once at construction.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a [`StreamEngine`](crate::StreamEngine).
///
/// Field names use camelCase on the wire so the same table can be shared
/// with component configs written for other tooling:
///
/// ```toml
/// bufferSize = 256
/// retryDelay = 500
/// showTimestamps = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StreamConfig {
    /// Capacity of the recent-chunk window.
    pub buffer_size: usize,
    /// Preferred payload size in bytes. Advisory: only used when splitting
    /// oversized producer payloads.
    pub chunk_size: usize,
    /// Automatic restarts allowed after transport failures.
    pub max_retries: u32,
    /// Delay before each automatic restart.
    #[serde(with = "millis")]
    pub retry_delay: Duration,
    /// Restart automatically after a transport failure.
    pub auto_reconnect: bool,
    /// Paint a progress line under the content.
    pub show_progress: bool,
    /// Paint a throughput line under the content.
    pub show_stats: bool,
    /// Prefix each chunk with its ingestion time.
    pub show_timestamps: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1024,
            chunk_size: 512,
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            auto_reconnect: true,
            show_progress: true,
            show_stats: true,
            show_timestamps: false,
        }
    }
}

impl StreamConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every numeric field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size == 0 {
            return Err(ConfigError::InvalidBufferSize(self.buffer_size));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize(self.chunk_size));
        }
        if self.auto_reconnect && self.max_retries > 0 && self.retry_delay.is_zero() {
            return Err(ConfigError::InvalidRetryDelay);
        }
        Ok(())
    }

    /// Set the window capacity.
    #[must_use]
    pub const fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Set the retry budget and delay.
    #[must_use]
    pub const fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
