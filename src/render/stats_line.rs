//! Stats line: One-line throughput summary.

use crate::stats::StatsSnapshot;
use std::time::Duration;

/// Human-readable byte count: `512 B`, `1.5 KB`, `3.2 MB`.
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: f64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    if bytes >= MB {
        format!("{:.1} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{bytes:.0} B")
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs >= 60.0 {
        let whole = duration.as_secs();
        format!("{}m{:02}s", whole / 60, whole % 60)
    } else {
        format!("{secs:.1}s")
    }
}

/// `12 chunks · 1.2 KB · 10.0 chunks/s · 1.0 KB/s · 1.2s`
#[allow(clippy::cast_precision_loss)]
pub fn stats_line(stats: &StatsSnapshot) -> String {
    let noun = if stats.total_chunks == 1 { "chunk" } else { "chunks" };
    format!(
        "{} {noun} · {} · {:.1} chunks/s · {}/s · {}",
        stats.total_chunks,
        format_bytes(stats.total_bytes as f64),
        stats.chunks_per_second,
        format_bytes(stats.bytes_per_second),
        format_duration(stats.duration),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0.0), "0 B");
        assert_eq!(format_bytes(512.0), "512 B");
        assert_eq!(format_bytes(1536.0), "1.5 KB");
        assert_eq!(format_bytes(3.0 * 1024.0 * 1024.0), "3.0 MB");
    }

    #[test]
    fn test_stats_line() {
        let stats = StatsSnapshot {
            total_chunks: 10,
            total_bytes: 1000,
            duration: Duration::from_secs(1),
            chunks_per_second: 10.0,
            bytes_per_second: 1000.0,
            average_chunk_size: 100.0,
            ..StatsSnapshot::default()
        };
        assert_eq!(
            stats_line(&stats),
            "10 chunks · 1000 B · 10.0 chunks/s · 1000 B/s · 1.0s"
        );
    }

    #[test]
    fn test_stats_line_minutes() {
        let stats = StatsSnapshot {
            total_chunks: 1,
            duration: Duration::from_secs(125),
            ..StatsSnapshot::default()
        };
        assert!(stats_line(&stats).starts_with("1 chunk ·"));
        assert!(stats_line(&stats).ends_with("2m05s"));
    }
}
