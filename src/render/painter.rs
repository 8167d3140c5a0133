//! Terminal painter: Paints materialized content into a terminal region.
//!
//! Content is soft-wrapped to the region width by display width and the
//! newest rows are kept when it does not fit (stick-to-bottom scrolling).
//! The last row of the region shows the state label. Everything is queued
//! and flushed in a single write.

use super::Renderer;
use crate::error::RenderError;
use crate::layout::Rect;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::Write;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Renderer that draws into a rectangular region of a terminal.
pub struct TerminalPainter<W: Write> {
    /// Output sink, usually stdout.
    out: W,
    /// Region to paint, status row included.
    bounds: Rect,
}

impl<W: Write> TerminalPainter<W> {
    /// Paint into `bounds` of `out`.
    pub const fn new(out: W, bounds: Rect) -> Self {
        Self { out, bounds }
    }

    /// Current region.
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Move or resize the region (e.g. after a terminal resize).
    pub const fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Recover the output sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Row holding the state label, relative to the region.
    const fn status_row(&self) -> u16 {
        self.bounds.height.saturating_sub(1)
    }
}

impl<W: Write> Renderer for TerminalPainter<W> {
    fn paint(&mut self, content: &str, state_label: &str) -> Result<(), RenderError> {
        if self.bounds.is_empty() {
            return Ok(());
        }

        let (body, status) = self.bounds.split_vertical(self.status_row());
        let width = self.bounds.width as usize;
        let body_height = body.height as usize;

        let visible = tail_rows(content, width, body_height);

        for row in 0..body.height {
            let line = body.row(row);
            queue!(self.out, MoveTo(line.x, line.y), Clear(ClearType::UntilNewLine))?;
            if let Some(text) = visible.get(row as usize) {
                queue!(self.out, Print(text))?;
            }
        }

        let label = truncate(&format!("[{state_label}]"), width);
        queue!(
            self.out,
            MoveTo(status.x, status.y),
            Clear(ClearType::UntilNewLine),
            SetForegroundColor(label_color(state_label)),
            SetAttribute(Attribute::Bold),
            Print(label),
            SetAttribute(Attribute::Reset),
            ResetColor,
        )?;

        self.out.flush()?;
        Ok(())
    }
}

/// Color for a state label.
fn label_color(label: &str) -> Color {
    match label {
        "streaming" => Color::Green,
        "connecting" => Color::Blue,
        "paused" => Color::Yellow,
        "completed" => Color::Cyan,
        "error" => Color::Red,
        _ => Color::DarkGrey,
    }
}

/// The last `height` wrapped rows of `content`, oldest first.
///
/// Walks lines from the end, so the cost depends on the region size rather
/// than on how much content precedes it.
fn tail_rows(content: &str, width: usize, height: usize) -> Vec<String> {
    let mut rows = Vec::with_capacity(height);
    for line in content.lines().rev() {
        if rows.len() >= height {
            break;
        }
        let wrapped = wrap_line(line, width);
        rows.extend(wrapped.into_iter().rev());
    }
    rows.truncate(height);
    rows.reverse();
    rows
}

/// Split a line into rows at most `width` cells wide.
///
/// Tabs expand to four spaces. An empty line still occupies one row.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let line = line.replace('\t', "    ");
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut col = 0;

    for grapheme in line.graphemes(true) {
        let w = UnicodeWidthStr::width(grapheme);
        if col + w > width && col > 0 {
            rows.push(std::mem::take(&mut current));
            col = 0;
        }
        if w > width {
            // Wider than the whole region; drop it rather than overflow.
            continue;
        }
        current.push_str(grapheme);
        col += w;
    }
    rows.push(current);
    rows
}

/// Cut `text` to at most `width` cells.
fn truncate(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut col = 0;
    for grapheme in text.graphemes(true) {
        let w = UnicodeWidthStr::width(grapheme);
        if col + w > width {
            break;
        }
        out.push_str(grapheme);
        col += w;
    }
    out
}
