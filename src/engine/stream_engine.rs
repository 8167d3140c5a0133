//! Stream engine: The ingestion state machine.
//!
//! Owns the display log, the recent-chunk window, throughput stats and
//! progress for one stream. All mutation happens synchronously on the
//! caller's thread; nothing here blocks, sleeps or spawns.

use super::observer::StreamObserver;
use super::retry::{RetryDecision, RetryPolicy, RetryState};
use super::state::StreamState;
use crate::buffer::ChunkBuffer;
use crate::chunk::{Chunk, ChunkId, ChunkInput, ChunkKind};
use crate::clock::{Clock, SystemClock};
use crate::config::StreamConfig;
use crate::error::{ConfigError, StreamError};
use crate::input::StreamCommand;
use crate::progress::{parse_progress, Progress, ProgressTracker};
use crate::render::{append_chunk, append_footer, materialize, MaterializeOptions, Renderer};
use crate::stats::{StatsSnapshot, ThroughputStats};
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Live-updating stream display fed by an external producer.
///
/// ```
/// use flywheel_stream::{RecordingRenderer, StreamConfig, StreamEngine};
///
/// let renderer = RecordingRenderer::new();
/// let mut engine = StreamEngine::new(StreamConfig::default(), renderer.clone())?;
/// engine.start();
/// engine.add_chunk("Hello, ");
/// engine.add_chunk("world");
/// engine.stop();
///
/// assert!(engine.is_completed());
/// assert_eq!(engine.stats().total_chunks, 2);
/// assert!(renderer.last().unwrap().content.starts_with("Hello, world"));
/// # Ok::<(), flywheel_stream::ConfigError>(())
/// ```
pub struct StreamEngine {
    config: StreamConfig,
    options: MaterializeOptions,
    retry_policy: RetryPolicy,
    state: StreamState,
    /// Every visible chunk, in arrival order. Unbounded.
    log: Vec<Chunk>,
    /// `log` rendered without decorations, appended as chunks become visible.
    body: String,
    /// Chunks received while paused, not yet visible.
    pending: VecDeque<Chunk>,
    /// Bounded window of recent chunks.
    window: ChunkBuffer,
    stats: ThroughputStats,
    progress: ProgressTracker,
    retry: RetryState,
    next_id: u64,
    last_timestamp: Duration,
    last_error: Option<String>,
    renderer: Box<dyn Renderer>,
    clock: Box<dyn Clock>,
    observer: Box<dyn StreamObserver>,
}

impl StreamEngine {
    /// Create an idle engine painting through `renderer`.
    ///
    /// Fails if the configuration is invalid; no engine is built in that case.
    pub fn new(config: StreamConfig, renderer: impl Renderer + 'static) -> Result<Self, ConfigError> {
        config.validate()?;
        let window = ChunkBuffer::new(config.buffer_size)?;

        Ok(Self {
            options: MaterializeOptions::from(&config),
            retry_policy: RetryPolicy::from(&config),
            config,
            state: StreamState::Idle,
            log: Vec::new(),
            body: String::new(),
            pending: VecDeque::new(),
            window,
            stats: ThroughputStats::new(),
            progress: ProgressTracker::new(),
            retry: RetryState::default(),
            next_id: 0,
            last_timestamp: Duration::ZERO,
            last_error: None,
            renderer: Box::new(renderer),
            clock: Box::new(SystemClock::new()),
            observer: Box::new(()),
        })
    }

    /// Use `clock` for timestamps, durations and retry deadlines.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Deliver events to `observer`.
    #[must_use]
    pub fn with_observer(mut self, observer: impl StreamObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Override how content is materialized (bar width, style, decorations).
    #[must_use]
    pub fn with_materialize_options(mut self, options: MaterializeOptions) -> Self {
        self.options = options;
        self.body.clear();
        for chunk in &self.log {
            append_chunk(&mut self.body, chunk, &self.options);
        }
        self
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Begin a stream: `idle`/`error` → `connecting`.
    ///
    /// Resets stats, the recent window and progress, and the retry budget.
    /// The display log is kept until [`clear`](Self::clear).
    pub fn start(&mut self) {
        match self.state {
            StreamState::Idle | StreamState::Error => {
                self.retry.reset();
                self.begin_attempt();
            }
            StreamState::Completed => self.reject("start"),
            StreamState::Connecting | StreamState::Streaming | StreamState::Paused => {
                debug!(state = %self.state, "start ignored; stream already running");
            }
        }
    }

    /// The producer connected: `connecting` → `streaming`.
    pub fn mark_connected(&mut self) {
        if self.state == StreamState::Connecting {
            self.transition(StreamState::Streaming);
        } else {
            self.reject("mark_connected");
        }
    }

    /// Defer painting of new chunks. No-op when already paused.
    pub fn pause(&mut self) {
        match self.state {
            StreamState::Connecting | StreamState::Streaming => {
                self.transition(StreamState::Paused);
            }
            StreamState::Paused => {}
            _ => self.reject("pause"),
        }
    }

    /// Paint chunks deferred while paused, in arrival order, and continue.
    /// No-op when not paused.
    pub fn resume(&mut self) {
        if self.state != StreamState::Paused {
            return;
        }
        let flushed = self.flush_pending();
        debug!(flushed, "resuming stream");
        self.transition(StreamState::Streaming);
    }

    /// Cancel the stream: freeze stats and complete.
    ///
    /// Deferred chunks are made visible first. Chunks arriving afterwards are
    /// rejected. No-op when already completed. In `error`, cancels a
    /// scheduled reconnect.
    pub fn stop(&mut self) {
        match self.state {
            StreamState::Connecting | StreamState::Streaming | StreamState::Paused => {
                self.flush_pending();
                let now = self.now();
                self.stats.freeze(now);
                self.transition(StreamState::Completed);
                let final_stats = self.stats.snapshot(now);
                self.observer.on_complete(&final_stats);
            }
            StreamState::Completed => {}
            StreamState::Error => {
                if self.retry.cancel() {
                    debug!("scheduled reconnect cancelled");
                }
            }
            StreamState::Idle => self.reject("stop"),
        }
    }

    /// Drop every chunk, reset stats and progress, and return to `idle`.
    ///
    /// Allowed from any state; a running stream is abandoned and a scheduled
    /// reconnect is cancelled.
    pub fn clear(&mut self) {
        self.log.clear();
        self.body.clear();
        self.pending.clear();
        self.window.clear();
        self.stats.clear();
        self.progress.reset();
        self.retry.reset();
        self.last_error = None;

        if self.state == StreamState::Idle {
            self.repaint();
        } else {
            self.transition(StreamState::Idle);
        }
    }

    /// The producer or its transport failed.
    ///
    /// Moves a live stream to `error` with stats frozen. With auto reconnect
    /// on, a restart is scheduled for [`tick`](Self::tick) until the retry
    /// budget runs out, which is reported once as
    /// [`StreamError::RetryExhausted`].
    pub fn fail(&mut self, message: impl Into<String>) {
        if !self.state.accepts_chunks() {
            self.reject("fail");
            return;
        }

        let message = message.into();
        warn!(error = %message, state = %self.state, "stream transport failed");

        self.flush_pending();
        let now = self.now();
        self.stats.freeze(now);
        self.last_error = Some(message.clone());
        self.transition(StreamState::Error);

        match self.retry.schedule(&self.retry_policy, now) {
            RetryDecision::Scheduled(at) => {
                debug!(
                    attempt = self.retry.attempts() + 1,
                    max = self.retry_policy.max_retries,
                    due_ms = u64::try_from(at.as_millis()).unwrap_or(u64::MAX),
                    "reconnect scheduled"
                );
            }
            RetryDecision::Exhausted { attempts } => {
                self.emit_error(&StreamError::RetryExhausted {
                    attempts,
                    last_error: message,
                });
            }
            RetryDecision::Disabled => {
                self.emit_error(&StreamError::Transport(message));
            }
        }
    }

    /// Drive time-based work: performs a scheduled reconnect once due.
    ///
    /// Returns `true` if a reconnect was started.
    pub fn tick(&mut self) -> bool {
        if self.state != StreamState::Error {
            return false;
        }
        let now = self.now();
        let Some(attempt) = self.retry.take_due(now) else {
            return false;
        };
        debug!(attempt, max = self.retry_policy.max_retries, "reconnecting stream");
        self.begin_attempt();
        true
    }

    /// Repaint with up-to-date stats (e.g. from a frame ticker).
    pub fn refresh(&mut self) {
        self.repaint();
    }

    // ------------------------------------------------------------------
    // Ingestion
    // ------------------------------------------------------------------

    /// Ingest a chunk from the producer.
    ///
    /// Accepted while `connecting`, `streaming` or `paused`; returns the
    /// assigned id. In any other state the chunk is logged and dropped and
    /// `None` is returned. Chunks received while paused are recorded but
    /// stay invisible until [`resume`](Self::resume).
    pub fn add_chunk(&mut self, input: impl Into<ChunkInput>) -> Option<ChunkId> {
        if !self.state.accepts_chunks() {
            self.reject("add_chunk");
            return None;
        }
        if self.state == StreamState::Connecting {
            self.transition(StreamState::Streaming);
        }

        let timestamp = self.now().max(self.last_timestamp);
        self.last_timestamp = timestamp;
        let id = ChunkId(self.next_id);
        self.next_id += 1;
        let chunk = Chunk::from_input(id, timestamp, input.into());
        trace!(chunk_id = %id, kind = %chunk.kind, bytes = chunk.len(), "chunk ingested");

        self.window.push(chunk.clone());
        self.stats.record(&chunk, timestamp);
        let progress_changed = self.update_progress(&chunk);

        let visible = self.state != StreamState::Paused;
        if visible {
            self.observer.on_chunk(&chunk);
            self.push_visible(chunk);
        } else {
            self.pending.push_back(chunk);
        }

        let stats = self.stats.snapshot(timestamp);
        self.observer.on_stats(&stats);
        if progress_changed {
            let progress = self.progress.snapshot();
            self.observer.on_progress(&progress);
        }

        if visible {
            self.repaint();
        }
        Some(id)
    }

    // ------------------------------------------------------------------
    // Progress
    // ------------------------------------------------------------------

    /// Set the externally known total. Each visible content chunk then
    /// advances progress by one.
    pub fn set_total(&mut self, total: u64) {
        self.progress.set_total(total);
        self.progress_changed();
    }

    /// Move progress to `to` (clamped to the total when known).
    pub fn seek(&mut self, to: u64) {
        self.progress.seek(to);
        self.progress_changed();
    }

    /// Move progress to a fraction of the known total. Ignored without a total.
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    #[allow(clippy::cast_precision_loss)]
    pub fn seek_fraction(&mut self, fraction: f32) {
        let Some(total) = self.progress.total() else {
            debug!("seek by fraction ignored; no known total");
            return;
        };
        let fraction = f64::from(fraction.clamp(0.0, 1.0));
        self.seek((fraction * total as f64).round() as u64);
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Interpret a control command from host input.
    pub fn apply(&mut self, command: StreamCommand) {
        debug!(?command, state = %self.state, "applying command");
        match command {
            StreamCommand::TogglePause => {
                if self.state == StreamState::Paused {
                    self.resume();
                } else {
                    self.pause();
                }
            }
            StreamCommand::Pause => self.pause(),
            StreamCommand::Resume => self.resume(),
            StreamCommand::Stop => self.stop(),
            StreamCommand::Clear => self.clear(),
            StreamCommand::Restart => {
                if self.state == StreamState::Completed {
                    self.clear();
                }
                self.start();
            }
            StreamCommand::Seek(to) => self.seek(to),
            StreamCommand::SeekFraction(fraction) => self.seek_fraction(fraction),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Current state.
    pub const fn state(&self) -> StreamState {
        self.state
    }

    /// Throughput stats as of now (frozen once stopped or failed).
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.now())
    }

    /// Current progress.
    pub fn progress(&self) -> Progress {
        self.progress.snapshot()
    }

    /// Connecting, streaming or paused.
    pub const fn is_active(&self) -> bool {
        self.state.accepts_chunks()
    }

    /// Paused.
    pub fn is_paused(&self) -> bool {
        self.state == StreamState::Paused
    }

    /// Completed.
    pub fn is_completed(&self) -> bool {
        self.state == StreamState::Completed
    }

    /// In the error state.
    pub fn has_error(&self) -> bool {
        self.state == StreamState::Error
    }

    /// Most recent transport failure, until the next start or clear.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Visible chunks, in arrival order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.log
    }

    /// Chunks received while paused, not yet visible.
    pub fn pending_chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.pending.iter()
    }

    /// The bounded recent-chunk window.
    pub const fn window(&self) -> &ChunkBuffer {
        &self.window
    }

    /// Configuration the engine was built with.
    pub const fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Automatic reconnects performed since the last explicit start.
    pub const fn retry_attempts(&self) -> u32 {
        self.retry.attempts()
    }

    /// When the scheduled reconnect is due, if any.
    pub const fn next_retry_at(&self) -> Option<Duration> {
        self.retry.due_at()
    }

    /// The string the renderer is currently given.
    pub fn content(&self) -> String {
        let mut content = self.body.clone();
        append_footer(&mut content, &self.progress.snapshot(), &self.stats(), &self.options);
        content
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// All retained content, deferred chunks included, without decorations.
    pub fn export_text(&self) -> String {
        let bare = MaterializeOptions {
            show_progress: false,
            show_stats: false,
            show_timestamps: false,
            ..self.options
        };
        materialize(
            self.log.iter().chain(self.pending.iter()),
            &Progress::default(),
            &StatsSnapshot::default(),
            &bare,
        )
    }

    /// Chunks, stats, progress and state as JSON.
    pub fn export_json(&self) -> serde_json::Result<String> {
        let export = Export {
            state: self.state,
            chunks: self.log.iter().chain(self.pending.iter()).collect(),
            stats: self.stats(),
            progress: self.progress(),
        };
        serde_json::to_string_pretty(&export)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Fresh attempt: reset per-attempt data and enter `connecting`.
    fn begin_attempt(&mut self) {
        let now = self.now();
        self.stats.reset(now);
        self.window.clear();
        self.progress.rewind();
        self.last_error = None;
        self.transition(StreamState::Connecting);
    }

    fn transition(&mut self, to: StreamState) {
        if self.state == to {
            return;
        }
        let from = self.state;
        self.state = to;
        debug!(from = %from, to = %to, "stream state changed");
        self.observer.on_state_change(to);
        self.repaint();
    }

    /// Paint the body with the footer appended in place, then trim the
    /// footer off again. Costs the footer, not the log.
    fn repaint(&mut self) {
        let body_len = self.body.len();
        let progress = self.progress.snapshot();
        let stats = self.stats();
        append_footer(&mut self.body, &progress, &stats, &self.options);
        let painted = self.renderer.paint(&self.body, self.state.label());
        self.body.truncate(body_len);

        if let Err(err) = painted {
            warn!(error = %err, "render failed");
            self.emit_error(&StreamError::Render(err));
        }
    }

    /// Move deferred chunks into the display log, notifying in order.
    fn flush_pending(&mut self) -> usize {
        let count = self.pending.len();
        while let Some(chunk) = self.pending.pop_front() {
            self.observer.on_chunk(&chunk);
            self.push_visible(chunk);
        }
        count
    }

    fn push_visible(&mut self, chunk: Chunk) {
        append_chunk(&mut self.body, &chunk, &self.options);
        self.log.push(chunk);
    }

    fn update_progress(&mut self, chunk: &Chunk) -> bool {
        let before = self.progress.snapshot();

        if chunk.kind == ChunkKind::Progress {
            let parsed = parse_progress(&chunk.content);
            let total = chunk.metadata_u64("total").or(parsed.and_then(|(_, t)| t));
            let current = chunk.metadata_u64("current").or(parsed.map(|(c, _)| c));
            if let Some(total) = total {
                self.progress.set_total(total);
            }
            if let Some(current) = current {
                self.progress.seek(current);
            }
        } else if chunk.kind.is_displayed() && self.progress.total().is_some() {
            self.progress.advance(1);
        }

        let after = self.progress.snapshot();
        if after != before && self.progress.is_complete() {
            debug!(current = after.current, "progress reached its total");
        }
        after != before
    }

    fn progress_changed(&mut self) {
        let progress = self.progress.snapshot();
        self.observer.on_progress(&progress);
        if self.state != StreamState::Paused {
            self.repaint();
        }
    }

    fn emit_error(&mut self, error: &StreamError) {
        self.observer.on_error(error);
    }

    fn reject(&self, operation: &'static str) {
        let err = StreamError::Protocol {
            operation,
            state: self.state,
        };
        warn!(error = %err, "ignoring call");
    }
}

#[derive(Serialize)]
struct Export<'a> {
    state: StreamState,
    chunks: Vec<&'a Chunk>,
    stats: StatsSnapshot,
    progress: Progress,
}
