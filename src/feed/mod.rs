//! Producer feed: Hands chunks from producer threads to the engine.
//!
//! The engine is single-threaded. Producers running on other threads send
//! [`FeedEvent`]s through a [`FeedSender`]; the host thread drains them into
//! the engine with [`FeedReceiver::pump`] between frames.

mod split;

pub use split::split_graphemes;

use crate::chunk::ChunkInput;
use crate::engine::StreamEngine;
use crate::error::FeedClosed;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;
use tracing::debug;

/// Message from a producer.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// The transport is up.
    Connected,
    /// A chunk of output.
    Chunk(ChunkInput),
    /// The transport failed.
    Failed(String),
    /// The producer finished normally.
    Finished,
}

/// Create an unbounded feed.
pub fn channel() -> (FeedSender, FeedReceiver) {
    wrap(crossbeam_channel::unbounded())
}

/// Create a feed holding at most `capacity` undrained events; senders block
/// when it is full.
pub fn bounded(capacity: usize) -> (FeedSender, FeedReceiver) {
    wrap(crossbeam_channel::bounded(capacity))
}

fn wrap((tx, rx): (Sender<FeedEvent>, Receiver<FeedEvent>)) -> (FeedSender, FeedReceiver) {
    (
        FeedSender { tx },
        FeedReceiver {
            rx,
            disconnected: false,
        },
    )
}

/// Producer half. Cheap to clone and `Send`.
#[derive(Debug, Clone)]
pub struct FeedSender {
    tx: Sender<FeedEvent>,
}

impl FeedSender {
    /// Send a raw event.
    pub fn send(&self, event: FeedEvent) -> Result<(), FeedClosed> {
        self.tx.send(event).map_err(|_| FeedClosed)
    }

    /// Send one chunk.
    pub fn chunk(&self, input: impl Into<ChunkInput>) -> Result<(), FeedClosed> {
        self.send(FeedEvent::Chunk(input.into()))
    }

    /// Send text as a single text chunk.
    pub fn send_text(&self, text: impl Into<String>) -> Result<(), FeedClosed> {
        self.chunk(ChunkInput::text(text))
    }

    /// Send text as several text chunks of at most `max_bytes` each,
    /// never splitting a grapheme. Returns the number of chunks sent.
    pub fn send_split(&self, text: &str, max_bytes: usize) -> Result<usize, FeedClosed> {
        let pieces = split_graphemes(text, max_bytes);
        let count = pieces.len();
        for piece in pieces {
            self.send_text(piece)?;
        }
        Ok(count)
    }

    /// Report the transport as connected.
    pub fn connected(&self) -> Result<(), FeedClosed> {
        self.send(FeedEvent::Connected)
    }

    /// Report a transport failure.
    pub fn fail(&self, message: impl Into<String>) -> Result<(), FeedClosed> {
        self.send(FeedEvent::Failed(message.into()))
    }

    /// Report normal completion.
    pub fn finish(&self) -> Result<(), FeedClosed> {
        self.send(FeedEvent::Finished)
    }
}

/// Host half, drained on the engine's thread.
#[derive(Debug)]
pub struct FeedReceiver {
    rx: Receiver<FeedEvent>,
    disconnected: bool,
}

impl FeedReceiver {
    /// Apply every queued event to `engine` without blocking.
    ///
    /// Returns the number of events applied.
    pub fn pump(&mut self, engine: &mut StreamEngine) -> usize {
        let mut applied = 0;
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    apply(engine, event);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.mark_disconnected();
                    break;
                }
            }
        }
        applied
    }

    /// Wait up to `timeout` for the first event, then drain like
    /// [`pump`](Self::pump).
    pub fn pump_timeout(&mut self, engine: &mut StreamEngine, timeout: Duration) -> usize {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                apply(engine, event);
                1 + self.pump(engine)
            }
            Err(RecvTimeoutError::Timeout) => 0,
            Err(RecvTimeoutError::Disconnected) => {
                self.mark_disconnected();
                0
            }
        }
    }

    /// Every sender is gone and the queue is drained.
    pub const fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// No queued events.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    fn mark_disconnected(&mut self) {
        if !self.disconnected {
            debug!("all feed senders dropped");
            self.disconnected = true;
        }
    }
}

fn apply(engine: &mut StreamEngine, event: FeedEvent) {
    match event {
        FeedEvent::Connected => engine.mark_connected(),
        FeedEvent::Chunk(input) => {
            engine.add_chunk(input);
        }
        FeedEvent::Failed(message) => engine.fail(message),
        FeedEvent::Finished => engine.stop(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::StreamConfig;
    use crate::engine::StreamState;
    use crate::render::RecordingRenderer;
    use std::thread;

    fn engine() -> StreamEngine {
        StreamEngine::new(StreamConfig::default(), RecordingRenderer::new())
            .unwrap()
            .with_clock(ManualClock::new())
    }

    #[test]
    fn test_pump_applies_in_order() {
        let (tx, mut rx) = channel();
        let mut engine = engine();
        engine.start();

        tx.connected().unwrap();
        tx.send_text("a").unwrap();
        tx.send_text("b").unwrap();
        tx.finish().unwrap();

        assert_eq!(rx.len(), 4);
        assert_eq!(rx.pump(&mut engine), 4);
        assert!(engine.is_completed());
        assert_eq!(engine.export_text(), "ab");
        assert!(rx.is_empty());
    }

    #[test]
    fn test_producer_thread() {
        let (tx, mut rx) = bounded(8);
        let mut engine = engine();
        engine.start();

        let producer = thread::spawn(move || {
            for i in 0..20 {
                tx.send_text(format!("{i} ")).unwrap();
            }
            tx.finish().unwrap();
        });

        while !rx.is_disconnected() {
            rx.pump_timeout(&mut engine, Duration::from_millis(50));
        }
        producer.join().unwrap();

        assert!(engine.is_completed());
        assert_eq!(engine.stats().total_chunks, 20);
    }

    #[test]
    fn test_failed_event() {
        let (tx, mut rx) = channel();
        let mut engine = engine();
        engine.start();
        tx.fail("socket closed").unwrap();
        rx.pump(&mut engine);

        assert_eq!(engine.state(), StreamState::Error);
        assert_eq!(engine.last_error(), Some("socket closed"));
    }

    #[test]
    fn test_send_split() {
        let (tx, rx) = channel();
        assert_eq!(tx.send_split("abcdefg", 3).unwrap(), 3);
        drop(tx);
        let pieces: Vec<FeedEvent> = rx.rx.iter().collect();
        assert_eq!(
            pieces,
            vec![
                FeedEvent::Chunk(ChunkInput::text("abc")),
                FeedEvent::Chunk(ChunkInput::text("def")),
                FeedEvent::Chunk(ChunkInput::text("g")),
            ]
        );
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (tx, rx) = channel();
        drop(rx);
        assert_eq!(tx.send_text("lost"), Err(FeedClosed));
    }
}
