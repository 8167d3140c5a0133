//! Recording renderer: Keeps every paint call.

use super::Renderer;
use crate::error::RenderError;
use std::cell::RefCell;
use std::rc::Rc;

/// One paint call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Materialized content.
    pub content: String,
    /// State label at paint time.
    pub label: String,
}

/// Renderer that records frames instead of drawing them.
///
/// Clones share the same frame list, so a test can hand one clone to the
/// engine and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    frames: Rc<RefCell<Vec<Frame>>>,
}

impl RecordingRenderer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of paint calls so far.
    pub fn paint_count(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Copy of every recorded frame, oldest first.
    pub fn frames(&self) -> Vec<Frame> {
        self.frames.borrow().clone()
    }

    /// The most recent frame.
    pub fn last(&self) -> Option<Frame> {
        self.frames.borrow().last().cloned()
    }

    /// State labels of every frame, oldest first.
    pub fn labels(&self) -> Vec<String> {
        self.frames.borrow().iter().map(|f| f.label.clone()).collect()
    }

    /// Forget recorded frames.
    pub fn reset(&self) {
        self.frames.borrow_mut().clear();
    }
}

impl Renderer for RecordingRenderer {
    fn paint(&mut self, content: &str, state_label: &str) -> Result<(), RenderError> {
        self.frames.borrow_mut().push(Frame {
            content: content.to_string(),
            label: state_label.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_shared_between_clones() {
        let recorder = RecordingRenderer::new();
        let mut handle = recorder.clone();
        handle.paint("abc", "streaming").unwrap();
        handle.paint("abcd", "paused").unwrap();

        assert_eq!(recorder.paint_count(), 2);
        assert_eq!(recorder.labels(), vec!["streaming", "paused"]);
        assert_eq!(recorder.last().map(|f| f.content), Some("abcd".to_string()));

        recorder.reset();
        assert_eq!(handle.paint_count(), 0);
    }
}
