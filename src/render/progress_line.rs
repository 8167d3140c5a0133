//! Progress line: Horizontal text progress indicator.
//!
//! A fixed-width bar followed by a right-aligned percentage, e.g.
//! `▓▓▓▓▓▓░░░░  60%`.

/// Visual style for the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressStyle {
    /// Classic solid bar: ████████░░░░
    Solid,
    /// ASCII style: [========  ]
    Ascii,
    /// Block characters: ▓▓▓▓▓▓░░░░
    #[default]
    Block,
    /// Thin line: ━━━━━━───────
    Line,
}

impl ProgressStyle {
    /// Filled and empty characters for this style.
    const fn chars(self) -> (char, char) {
        match self {
            Self::Solid => ('█', '░'),
            Self::Ascii => ('=', ' '),
            Self::Block => ('▓', '░'),
            Self::Line => ('━', '─'),
        }
    }
}

/// Render a bar `width` cells wide for `fraction` (clamped to `0.0..=1.0`).
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_precision_loss)]
pub fn progress_line(fraction: f32, width: usize, style: ProgressStyle) -> String {
    let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    let (filled_char, empty_char) = style.chars();
    let filled_count = (fraction * width as f32).round() as usize;

    let mut line = String::with_capacity(width * 3 + 8);
    if style == ProgressStyle::Ascii {
        line.push('[');
    }
    for i in 0..width {
        line.push(if i < filled_count { filled_char } else { empty_char });
    }
    if style == ProgressStyle::Ascii {
        line.push(']');
    }
    line.push_str(&format!(" {:>3}%", (fraction * 100.0).round() as u32));
    line
}
