//! Render module: The boundary between the engine and whatever paints it.
//!
//! The engine turns its display log into one materialized string and hands
//! it, together with the current state label, to a [`Renderer`]. It never
//! reads anything back.
//!
//! - [`materialize`]: builds the painted string from chunks, progress and stats
//! - [`TerminalPainter`]: paints into a region of a real terminal via crossterm
//! - [`RecordingRenderer`]: keeps every paint call, for tests and snapshots

mod materialize;
mod painter;
mod progress_line;
mod recording;
mod stats_line;

pub use materialize::{append_chunk, append_footer, materialize, MaterializeOptions};
pub use painter::TerminalPainter;
pub use progress_line::{progress_line, ProgressStyle};
pub use recording::{Frame, RecordingRenderer};
pub use stats_line::{format_bytes, stats_line};

use crate::error::RenderError;

/// Adapter that paints materialized content.
///
/// Called synchronously by the engine after every visible change and on
/// every state transition.
pub trait Renderer {
    /// Paint `content` and show `state_label` (e.g. `"paused"`).
    fn paint(&mut self, content: &str, state_label: &str) -> Result<(), RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn paint(&mut self, content: &str, state_label: &str) -> Result<(), RenderError> {
        (**self).paint(content, state_label)
    }
}

/// Renderer that discards everything. Useful for headless ingestion.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn paint(&mut self, _content: &str, _state_label: &str) -> Result<(), RenderError> {
        Ok(())
    }
}
