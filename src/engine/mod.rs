//! Stream engine: State machine, retry scheduling and host callbacks.

mod observer;
mod retry;
mod state;
mod stream_engine;

pub use observer::{RecordingObserver, StreamCallbacks, StreamEvent, StreamObserver};
pub use retry::{RetryDecision, RetryPolicy};
pub use state::StreamState;
pub use stream_engine::StreamEngine;
