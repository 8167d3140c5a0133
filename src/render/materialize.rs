//! Materialization: Display log + progress + stats → one paintable string.

use super::progress_line::{progress_line, ProgressStyle};
use super::stats_line::stats_line;
use crate::chunk::{Chunk, ChunkKind};
use crate::config::StreamConfig;
use crate::progress::Progress;
use crate::stats::StatsSnapshot;
use std::fmt::Write;
use std::time::Duration;

/// Which decorations to include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterializeOptions {
    /// Append a progress line.
    pub show_progress: bool,
    /// Append a throughput line.
    pub show_stats: bool,
    /// Put each chunk on its own line, prefixed with its ingestion time.
    pub show_timestamps: bool,
    /// Width of the progress bar, in cells.
    pub progress_width: usize,
    /// Style of the progress bar.
    pub progress_style: ProgressStyle,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self::from(&StreamConfig::default())
    }
}

impl From<&StreamConfig> for MaterializeOptions {
    fn from(config: &StreamConfig) -> Self {
        Self {
            show_progress: config.show_progress,
            show_stats: config.show_stats,
            show_timestamps: config.show_timestamps,
            progress_width: 30,
            progress_style: ProgressStyle::Block,
        }
    }
}

/// Build the painted content.
///
/// Text, code and data chunks are concatenated in order. Error chunks start
/// on a fresh line with an `error: ` prefix. Metadata, progress and complete
/// chunks are not painted in the body.
pub fn materialize<'a>(
    chunks: impl IntoIterator<Item = &'a Chunk>,
    progress: &Progress,
    stats: &StatsSnapshot,
    options: &MaterializeOptions,
) -> String {
    let mut out = String::new();
    for chunk in chunks {
        append_chunk(&mut out, chunk, options);
    }
    append_footer(&mut out, progress, stats, options);
    out
}

/// Append one chunk's body text to `out`.
///
/// Depends only on the chunk and the tail of `out`, so a body built by
/// appending chunk by chunk equals one built in a single pass.
pub fn append_chunk(out: &mut String, chunk: &Chunk, options: &MaterializeOptions) {
    if !chunk.kind.is_displayed() {
        return;
    }
    if options.show_timestamps {
        start_line(out);
        let _ = write!(out, "[{}] ", format_offset(chunk.timestamp));
        if chunk.kind == ChunkKind::Error {
            out.push_str("error: ");
        }
        out.push_str(chunk.content.trim_end_matches('\n'));
        out.push('\n');
    } else if chunk.kind == ChunkKind::Error {
        start_line(out);
        out.push_str("error: ");
        out.push_str(chunk.content.trim_end_matches('\n'));
        out.push('\n');
    } else {
        out.push_str(&chunk.content);
    }
}

/// Append the progress and stats lines enabled in `options`.
pub fn append_footer(
    out: &mut String,
    progress: &Progress,
    stats: &StatsSnapshot,
    options: &MaterializeOptions,
) {
    if options.show_progress && (progress.total.is_some() || progress.current > 0) {
        start_line(out);
        match progress.fraction() {
            Some(fraction) => {
                out.push_str(&progress_line(fraction, options.progress_width, options.progress_style));
            }
            None => {
                let _ = write!(out, "progress: {}", progress.current);
            }
        }
        out.push('\n');
    }

    if options.show_stats {
        start_line(out);
        out.push_str(&stats_line(stats));
        out.push('\n');
    }
}

/// Ensure the next write begins on a new line.
fn start_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// `+1.234s`
fn format_offset(offset: Duration) -> String {
    format!("+{}.{:03}s", offset.as_secs(), offset.subsec_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{ChunkId, ChunkInput};

    fn chunk(n: u64, kind: ChunkKind, content: &str) -> Chunk {
        Chunk::from_input(
            ChunkId(n),
            Duration::from_millis(n * 1500),
            ChunkInput::new(kind, content),
        )
    }

    fn bare() -> MaterializeOptions {
        MaterializeOptions {
            show_progress: false,
            show_stats: false,
            show_timestamps: false,
            ..MaterializeOptions::default()
        }
    }

    #[test]
    fn test_materialize_concatenates_text() {
        let chunks = [
            chunk(0, ChunkKind::Text, "Hello, "),
            chunk(1, ChunkKind::Text, "world"),
            chunk(2, ChunkKind::Metadata, "{\"model\":\"x\"}"),
        ];
        let out = materialize(&chunks, &Progress::default(), &StatsSnapshot::default(), &bare());
        assert_eq!(out, "Hello, world");
    }

    #[test]
    fn test_materialize_error_on_own_line() {
        let chunks = [
            chunk(0, ChunkKind::Text, "partial"),
            chunk(1, ChunkKind::Error, "boom"),
            chunk(2, ChunkKind::Text, "after"),
        ];
        let out = materialize(&chunks, &Progress::default(), &StatsSnapshot::default(), &bare());
        assert_eq!(out, "partial\nerror: boom\nafter");
    }

    #[test]
    fn test_materialize_timestamps() {
        let chunks = [chunk(0, ChunkKind::Text, "a"), chunk(1, ChunkKind::Code, "b\n")];
        let options = MaterializeOptions {
            show_timestamps: true,
            ..bare()
        };
        let out = materialize(&chunks, &Progress::default(), &StatsSnapshot::default(), &options);
        assert_eq!(out, "[+0.000s] a\n[+1.500s] b\n");
    }

    #[test]
    fn test_materialize_progress_and_stats() {
        let progress = Progress {
            current: 1,
            total: Some(2),
            percentage: Some(50.0),
        };
        let options = MaterializeOptions {
            show_progress: true,
            show_stats: true,
            progress_width: 4,
            ..bare()
        };
        let out = materialize(
            &[chunk(0, ChunkKind::Text, "x")],
            &progress,
            &StatsSnapshot::default(),
            &options,
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "x");
        assert_eq!(lines[1], "▓▓░░  50%");
        assert!(lines[2].starts_with("0 chunks"));
    }

    #[test]
    fn test_appended_body_matches_single_pass() {
        let chunks = [
            chunk(0, ChunkKind::Text, "a"),
            chunk(1, ChunkKind::Error, "bad"),
            chunk(2, ChunkKind::Progress, "1/2"),
            chunk(3, ChunkKind::Data, "b\n"),
        ];
        for options in [bare(), MaterializeOptions { show_timestamps: true, ..bare() }] {
            let mut body = String::new();
            for c in &chunks {
                append_chunk(&mut body, c, &options);
            }
            let whole = materialize(&chunks, &Progress::default(), &StatsSnapshot::default(), &options);
            assert_eq!(body, whole);
        }
    }

    #[test]
    fn test_materialize_progress_without_total() {
        let progress = Progress {
            current: 7,
            ..Progress::default()
        };
        let options = MaterializeOptions {
            show_progress: true,
            ..bare()
        };
        let out = materialize(std::iter::empty(), &progress, &StatsSnapshot::default(), &options);
        assert_eq!(out, "progress: 7\n");
    }
}
