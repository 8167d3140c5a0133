//! Stream lifecycle states.

use serde::Serialize;
use std::fmt;

/// Where a stream is in its lifecycle.
///
/// ```text
///   idle ──start──▶ connecting ──connected──▶ streaming ◀──resume── paused
///                       │  ▲                     │  └──pause──────────▲
///                       │  └───start/retry──┐    │
///                       ▼                   │    ▼
///                     error ◀───failure─────┴─ (any live state)
///                                                 │
///                                          stop   ▼
///                                             completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamState {
    /// Nothing running.
    #[default]
    Idle,
    /// Started, waiting for the producer to connect.
    Connecting,
    /// Chunks are being ingested and painted.
    Streaming,
    /// Chunks are ingested but painting is deferred.
    Paused,
    /// Stopped; stats are frozen.
    Completed,
    /// The producer failed; a retry may be scheduled.
    Error,
}

impl StreamState {
    /// Label handed to the renderer.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Streaming => "streaming",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    /// States in which chunks are accepted.
    pub const fn accepts_chunks(self) -> bool {
        matches!(self, Self::Connecting | Self::Streaming | Self::Paused)
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepting_states() {
        assert!(StreamState::Connecting.accepts_chunks());
        assert!(StreamState::Streaming.accepts_chunks());
        assert!(StreamState::Paused.accepts_chunks());
        assert!(!StreamState::Idle.accepts_chunks());
        assert!(!StreamState::Completed.accepts_chunks());
        assert!(!StreamState::Error.accepts_chunks());
    }

    #[test]
    fn test_label() {
        assert_eq!(StreamState::Paused.to_string(), "paused");
        assert_eq!(StreamState::default(), StreamState::Idle);
    }
}
