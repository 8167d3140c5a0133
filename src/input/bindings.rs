//! Key bindings and event conversion.

use crate::layout::Rect;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// A control command for the stream engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreamCommand {
    /// Pause if streaming, resume if paused.
    TogglePause,
    /// Defer painting of new chunks.
    Pause,
    /// Paint deferred chunks and continue.
    Resume,
    /// Cancel the stream and freeze stats.
    Stop,
    /// Drop all chunks and return to idle.
    Clear,
    /// Start again, clearing a completed stream first.
    Restart,
    /// Move progress to an absolute position.
    Seek(u64),
    /// Move progress to a fraction of the known total.
    SeekFraction(f32),
}

/// Which keys drive which commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    /// Toggles pause.
    pub toggle_pause: Vec<KeyCode>,
    /// Stops the stream.
    pub stop: Vec<KeyCode>,
    /// Clears the display.
    pub clear: Vec<KeyCode>,
    /// Restarts the stream.
    pub restart: Vec<KeyCode>,
    /// Row occupied by the progress bar; clicks on it seek.
    pub progress_bar: Option<Rect>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            toggle_pause: vec![KeyCode::Char(' '), KeyCode::Char('p')],
            stop: vec![KeyCode::Char('s'), KeyCode::Esc],
            clear: vec![KeyCode::Char('c')],
            restart: vec![KeyCode::Char('r')],
            progress_bar: None,
        }
    }
}

impl KeyBindings {
    /// Set the clickable progress bar region.
    #[must_use]
    pub fn with_progress_bar(mut self, bounds: Rect) -> Self {
        self.progress_bar = Some(bounds);
        self
    }

    /// Map a terminal event to a command, if it is bound.
    pub fn command_for(&self, event: &Event) -> Option<StreamCommand> {
        match event {
            Event::Key(key) => self.command_for_key(key),
            Event::Mouse(mouse) => self.command_for_mouse(mouse),
            _ => None,
        }
    }

    fn command_for_key(&self, key: &KeyEvent) -> Option<StreamCommand> {
        // Only presses; release and repeat would double-toggle.
        if key.kind != KeyEventKind::Press {
            return None;
        }
        // Ctrl-C belongs to the host.
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }

        let code = key.code;
        if self.toggle_pause.contains(&code) {
            Some(StreamCommand::TogglePause)
        } else if self.stop.contains(&code) {
            Some(StreamCommand::Stop)
        } else if self.clear.contains(&code) {
            Some(StreamCommand::Clear)
        } else if self.restart.contains(&code) {
            Some(StreamCommand::Restart)
        } else {
            None
        }
    }

    fn command_for_mouse(&self, mouse: &MouseEvent) -> Option<StreamCommand> {
        let MouseEventKind::Down(MouseButton::Left) = mouse.kind else {
            return None;
        };
        let bar = self.progress_bar?;
        if !bar.contains(mouse.column, mouse.row) {
            return None;
        }

        let offset = f32::from(mouse.column - bar.x);
        let span = f32::from(bar.width.saturating_sub(1).max(1));
        Some(StreamCommand::SeekFraction((offset / span).clamp(0.0, 1.0)))
    }
}
