//! Host callbacks.
//!
//! Every callback is optional: [`StreamObserver`] methods default to no-ops,
//! `()` observes nothing, and [`StreamCallbacks`] wires individual closures.

use super::StreamState;
use crate::chunk::Chunk;
use crate::error::StreamError;
use crate::progress::Progress;
use crate::stats::StatsSnapshot;
use std::cell::RefCell;
use std::rc::Rc;

/// Receives lifecycle and data events from a [`StreamEngine`](super::StreamEngine).
///
/// Callbacks run synchronously on the thread that drove the engine.
pub trait StreamObserver {
    /// A chunk became visible, in arrival order.
    fn on_chunk(&mut self, _chunk: &Chunk) {}

    /// The engine moved to a new state.
    fn on_state_change(&mut self, _state: StreamState) {}

    /// Progress changed.
    fn on_progress(&mut self, _progress: &Progress) {}

    /// Stats were recomputed after a chunk was recorded.
    fn on_stats(&mut self, _stats: &StatsSnapshot) {}

    /// A runtime error occurred.
    fn on_error(&mut self, _error: &StreamError) {}

    /// The stream was stopped; `stats` is the frozen final snapshot.
    fn on_complete(&mut self, _stats: &StatsSnapshot) {}
}

impl StreamObserver for () {}

type Callback<T> = Box<dyn FnMut(&T)>;

/// Closure-backed observer.
///
/// ```
/// use flywheel_stream::engine::StreamCallbacks;
///
/// let callbacks = StreamCallbacks::new()
///     .chunk(|chunk| println!("{}", chunk.content))
///     .error(|err| eprintln!("stream error: {err}"));
/// # let _ = callbacks;
/// ```
#[derive(Default)]
pub struct StreamCallbacks {
    chunk: Option<Callback<Chunk>>,
    state_change: Option<Callback<StreamState>>,
    progress: Option<Callback<Progress>>,
    stats: Option<Callback<StatsSnapshot>>,
    error: Option<Callback<StreamError>>,
    complete: Option<Callback<StatsSnapshot>>,
}

impl StreamCallbacks {
    /// No callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called for every visible chunk.
    #[must_use]
    pub fn chunk(mut self, f: impl FnMut(&Chunk) + 'static) -> Self {
        self.chunk = Some(Box::new(f));
        self
    }

    /// Called on every state transition.
    #[must_use]
    pub fn state_change(mut self, f: impl FnMut(&StreamState) + 'static) -> Self {
        self.state_change = Some(Box::new(f));
        self
    }

    /// Called when progress changes.
    #[must_use]
    pub fn progress(mut self, f: impl FnMut(&Progress) + 'static) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    /// Called after stats are recomputed.
    #[must_use]
    pub fn stats(mut self, f: impl FnMut(&StatsSnapshot) + 'static) -> Self {
        self.stats = Some(Box::new(f));
        self
    }

    /// Called on runtime errors.
    #[must_use]
    pub fn error(mut self, f: impl FnMut(&StreamError) + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }

    /// Called once when the stream completes.
    #[must_use]
    pub fn complete(mut self, f: impl FnMut(&StatsSnapshot) + 'static) -> Self {
        self.complete = Some(Box::new(f));
        self
    }
}

impl StreamObserver for StreamCallbacks {
    fn on_chunk(&mut self, chunk: &Chunk) {
        if let Some(f) = self.chunk.as_mut() {
            f(chunk);
        }
    }

    fn on_state_change(&mut self, state: StreamState) {
        if let Some(f) = self.state_change.as_mut() {
            f(&state);
        }
    }

    fn on_progress(&mut self, progress: &Progress) {
        if let Some(f) = self.progress.as_mut() {
            f(progress);
        }
    }

    fn on_stats(&mut self, stats: &StatsSnapshot) {
        if let Some(f) = self.stats.as_mut() {
            f(stats);
        }
    }

    fn on_error(&mut self, error: &StreamError) {
        if let Some(f) = self.error.as_mut() {
            f(error);
        }
    }

    fn on_complete(&mut self, stats: &StatsSnapshot) {
        if let Some(f) = self.complete.as_mut() {
            f(stats);
        }
    }
}

/// An observed event, as captured by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// See [`StreamObserver::on_chunk`].
    Chunk(Chunk),
    /// See [`StreamObserver::on_state_change`].
    StateChange(StreamState),
    /// See [`StreamObserver::on_progress`].
    Progress(Progress),
    /// See [`StreamObserver::on_stats`].
    Stats(StatsSnapshot),
    /// See [`StreamObserver::on_error`]; holds the rendered message.
    Error(String),
    /// See [`StreamObserver::on_complete`].
    Complete(StatsSnapshot),
}

/// Observer that records every event behind a shared handle.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Rc<RefCell<Vec<StreamEvent>>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all events, oldest first.
    pub fn events(&self) -> Vec<StreamEvent> {
        self.events.borrow().clone()
    }

    /// Chunks passed to `on_chunk`, in order.
    pub fn chunks(&self) -> Vec<Chunk> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Chunk(c) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    /// States passed to `on_state_change`, in order.
    pub fn states(&self) -> Vec<StreamState> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                StreamEvent::StateChange(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    /// Error messages passed to `on_error`, in order.
    pub fn errors(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Error(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded events.
    pub fn reset(&self) {
        self.events.borrow_mut().clear();
    }

    fn push(&self, event: StreamEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl StreamObserver for RecordingObserver {
    fn on_chunk(&mut self, chunk: &Chunk) {
        self.push(StreamEvent::Chunk(chunk.clone()));
    }

    fn on_state_change(&mut self, state: StreamState) {
        self.push(StreamEvent::StateChange(state));
    }

    fn on_progress(&mut self, progress: &Progress) {
        self.push(StreamEvent::Progress(*progress));
    }

    fn on_stats(&mut self, stats: &StatsSnapshot) {
        self.push(StreamEvent::Stats(*stats));
    }

    fn on_error(&mut self, error: &StreamError) {
        self.push(StreamEvent::Error(error.to_string()));
    }

    fn on_complete(&mut self, stats: &StatsSnapshot) {
        self.push(StreamEvent::Complete(*stats));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callbacks_invoked() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut callbacks = StreamCallbacks::new().state_change(move |s| sink.borrow_mut().push(*s));

        callbacks.on_state_change(StreamState::Connecting);
        callbacks.on_state_change(StreamState::Streaming);
        callbacks.on_complete(&StatsSnapshot::default());

        assert_eq!(
            *seen.borrow(),
            vec![StreamState::Connecting, StreamState::Streaming]
        );
    }

    #[test]
    fn test_recording_observer_filters() {
        let mut recorder = RecordingObserver::new();
        recorder.on_state_change(StreamState::Paused);
        recorder.on_error(&StreamError::Transport("eof".to_string()));

        assert_eq!(recorder.states(), vec![StreamState::Paused]);
        assert_eq!(recorder.errors(), vec!["transport failure: eof".to_string()]);
        assert!(recorder.chunks().is_empty());
    }
}
