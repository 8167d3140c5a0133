//! # Flywheel Stream
//!
//! A streaming ingestion engine for terminal UIs.
//!
//! An external producer (a network stream, a subprocess, a model emitting
//! tokens) hands text in incrementally. The engine keeps an ordered display
//! log and a bounded window of recent chunks, tracks throughput and
//! progress, and repaints through a pluggable [`Renderer`] as content
//! arrives.
//!
//! ## Core Concepts
//!
//! - **State machine**: `idle → connecting → streaming ⇄ paused → completed`,
//!   with `error` and scheduled reconnects on transport failure
//! - **Deferred painting**: chunks received while paused are recorded but
//!   painted only on resume, in order, with one repaint
//! - **Injected time**: every timestamp and deadline comes from a [`Clock`]
//! - **Single-threaded core**: producers on other threads go through [`feed`]
//!
//! ## Example
//!
//! ```
//! use flywheel_stream::{ChunkInput, NullRenderer, StreamConfig, StreamEngine};
//!
//! let mut engine = StreamEngine::new(StreamConfig::default(), NullRenderer)?;
//! engine.start();
//! engine.set_total(2);
//! engine.add_chunk("first ");
//! engine.add_chunk(ChunkInput::text("second"));
//! engine.stop();
//!
//! assert_eq!(engine.progress().percentage, Some(100.0));
//! assert_eq!(engine.export_text(), "first second");
//! # Ok::<(), flywheel_stream::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod chunk;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod input;
pub mod layout;
pub mod progress;
pub mod render;
pub mod stats;

// Re-exports for convenience
pub use buffer::ChunkBuffer;
pub use chunk::{Chunk, ChunkId, ChunkInput, ChunkKind, Metadata};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::StreamConfig;
pub use engine::{StreamCallbacks, StreamEngine, StreamObserver, StreamState};
pub use error::{ConfigError, FeedClosed, RenderError, StreamError};
pub use feed::{FeedEvent, FeedReceiver, FeedSender};
pub use input::{KeyBindings, StreamCommand};
pub use layout::Rect;
pub use progress::{Progress, ProgressTracker};
pub use render::{NullRenderer, RecordingRenderer, Renderer, TerminalPainter};
pub use stats::{StatsSnapshot, ThroughputStats};
