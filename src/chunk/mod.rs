//! Chunk: One discrete unit of produced output.
//!
//! Producers hand the engine a [`ChunkInput`] (kind, content, optional
//! metadata). The engine stamps it with a [`ChunkId`] and an ingestion time
//! and from then on the resulting [`Chunk`] is immutable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Opaque key/value map carried through the engine unexamined.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// What a chunk carries. Only affects how it is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    /// Plain streamed text (tokens, log lines).
    #[default]
    Text,
    /// Source code.
    Code,
    /// Structured data such as a tool result.
    Data,
    /// An error message from the producer.
    Error,
    /// Out-of-band information, not painted in the body.
    Metadata,
    /// A progress report, e.g. `"3/10"`.
    Progress,
    /// End-of-output marker from the producer.
    Complete,
}

impl ChunkKind {
    /// Lowercase tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Code => "code",
            Self::Data => "data",
            Self::Error => "error",
            Self::Metadata => "metadata",
            Self::Progress => "progress",
            Self::Complete => "complete",
        }
    }

    /// Whether chunks of this kind appear in the painted body.
    pub const fn is_displayed(self) -> bool {
        matches!(self, Self::Text | Self::Code | Self::Data | Self::Error)
    }
}

impl fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier assigned at ingestion, unique per engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkId(pub u64);

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk-{}", self.0)
    }
}

/// A chunk as supplied by a producer, before ingestion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkInput {
    /// Rendering hint.
    pub kind: ChunkKind,
    /// Payload.
    pub content: String,
    /// Optional pass-through metadata.
    pub metadata: Option<Metadata>,
}

impl ChunkInput {
    /// Create an input of the given kind.
    pub fn new(kind: ChunkKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            metadata: None,
        }
    }

    /// Shorthand for a text chunk.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(ChunkKind::Text, content)
    }

    /// Shorthand for a progress chunk such as `"4/10"`.
    pub fn progress(content: impl Into<String>) -> Self {
        Self::new(ChunkKind::Progress, content)
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
        self
    }
}

impl From<&str> for ChunkInput {
    fn from(content: &str) -> Self {
        Self::text(content)
    }
}

impl From<String> for ChunkInput {
    fn from(content: String) -> Self {
        Self::text(content)
    }
}

/// An ingested chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Engine-assigned identifier.
    pub id: ChunkId,
    /// Rendering hint.
    #[serde(rename = "type")]
    pub kind: ChunkKind,
    /// Payload.
    pub content: String,
    /// Ingestion time on the engine clock.
    #[serde(with = "offset_millis")]
    pub timestamp: Duration,
    /// Pass-through metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Chunk {
    /// Stamp a producer input.
    pub fn from_input(id: ChunkId, timestamp: Duration, input: ChunkInput) -> Self {
        Self {
            id,
            kind: input.kind,
            content: input.content,
            timestamp,
            metadata: input.metadata,
        }
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Numeric metadata value, if present.
    pub fn metadata_u64(&self, key: &str) -> Option<u64> {
        self.metadata.as_ref()?.get(key)?.as_u64()
    }
}

mod offset_millis {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64() * 1000.0)
    }

    /// Non-negative milliseconds; out-of-range or NaN values are rejected.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(millis / 1000.0)
            .map_err(|err| D::Error::custom(format!("invalid timestamp {millis}ms: {err}")))
    }
}
