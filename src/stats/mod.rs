//! Throughput statistics for a stream.
//!
//! Counters are updated incrementally on every recorded chunk. Rates are
//! always derived from the counters and the elapsed time; they are never
//! set independently.

use crate::chunk::Chunk;
use serde::Serialize;
use std::time::Duration;

/// Point-in-time view of [`ThroughputStats`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    /// Chunks recorded since the last reset.
    pub total_chunks: u64,
    /// Payload bytes recorded since the last reset.
    pub total_bytes: u64,
    /// When the stream started, on the engine clock.
    pub start_time: Option<Duration>,
    /// When the stream stopped, on the engine clock.
    pub end_time: Option<Duration>,
    /// Elapsed time. Frozen once the stream stops.
    pub duration: Duration,
    /// Chunks per second over `duration`.
    pub chunks_per_second: f64,
    /// Bytes per second over `duration`.
    pub bytes_per_second: f64,
    /// Mean payload size in bytes.
    pub average_chunk_size: f64,
}

impl StatsSnapshot {
    /// True when nothing has been recorded and no clock is running.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Incrementally maintained volume and rate counters.
#[derive(Debug, Clone, Default)]
pub struct ThroughputStats {
    total_chunks: u64,
    total_bytes: u64,
    start_time: Option<Duration>,
    end_time: Option<Duration>,
    /// Elapsed time as of the last recomputation.
    duration: Duration,
    chunks_per_second: f64,
    bytes_per_second: f64,
    average_chunk_size: f64,
}

impl ThroughputStats {
    /// Create empty, unstarted stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero every counter and start timing from `start_time`.
    pub fn reset(&mut self, start_time: Duration) {
        *self = Self {
            start_time: Some(start_time),
            ..Self::default()
        };
    }

    /// Zero every counter and forget the start time.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Count a chunk and recompute rates at `now`.
    ///
    /// Returns `false` (and records nothing) once the stats are frozen; a
    /// producer racing `stop()` is expected, not fatal.
    pub fn record(&mut self, chunk: &Chunk, now: Duration) -> bool {
        if self.is_frozen() {
            tracing::warn!(chunk_id = %chunk.id, "chunk recorded after stats were frozen; ignoring");
            return false;
        }
        if self.start_time.is_none() {
            self.start_time = Some(now);
        }

        self.total_chunks += 1;
        self.total_bytes += chunk.len() as u64;
        self.recompute(now);
        true
    }

    /// Stop the clock at `end_time`. Later calls are ignored.
    pub fn freeze(&mut self, end_time: Duration) {
        if self.is_frozen() {
            return;
        }
        self.end_time = Some(end_time);
        self.recompute(end_time);
    }

    /// Whether [`freeze`](Self::freeze) has been called since the last reset.
    pub const fn is_frozen(&self) -> bool {
        self.end_time.is_some()
    }

    /// Chunks recorded since the last reset.
    pub const fn total_chunks(&self) -> u64 {
        self.total_chunks
    }

    /// Bytes recorded since the last reset.
    pub const fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Snapshot as seen at `now`.
    ///
    /// While running, the duration and rates reflect `now`; once frozen they
    /// stay at their stop-time values regardless of `now`.
    pub fn snapshot(&self, now: Duration) -> StatsSnapshot {
        let mut view = self.clone();
        if !view.is_frozen() && view.start_time.is_some() {
            view.recompute(now);
        }
        StatsSnapshot {
            total_chunks: view.total_chunks,
            total_bytes: view.total_bytes,
            start_time: view.start_time,
            end_time: view.end_time,
            duration: view.duration,
            chunks_per_second: view.chunks_per_second,
            bytes_per_second: view.bytes_per_second,
            average_chunk_size: view.average_chunk_size,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn recompute(&mut self, now: Duration) {
        let start = self.start_time.unwrap_or(now);
        self.duration = now.saturating_sub(start);

        let millis = self.duration.as_secs_f64() * 1000.0;
        self.chunks_per_second = per_second(self.total_chunks as f64, millis);
        self.bytes_per_second = per_second(self.total_bytes as f64, millis);
        self.average_chunk_size = if self.total_chunks == 0 {
            0.0
        } else {
            self.total_bytes as f64 / self.total_chunks as f64
        };
    }
}

/// `count / millis * 1000`, zero when no time has elapsed.
fn per_second(count: f64, millis: f64) -> f64 {
    if millis > 0.0 {
        count / millis * 1000.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{ChunkId, ChunkInput};
    use proptest::prelude::*;

    fn chunk(content: &str) -> Chunk {
        Chunk::from_input(ChunkId(0), Duration::ZERO, ChunkInput::text(content))
    }

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_stats_empty() {
        let stats = ThroughputStats::new();
        let snap = stats.snapshot(ms(500));
        assert!(snap.is_zero());
    }

    #[test]
    fn test_stats_zero_duration_has_zero_rates() {
        let mut stats = ThroughputStats::new();
        stats.reset(ms(100));
        stats.record(&chunk("abcd"), ms(100));

        let snap = stats.snapshot(ms(100));
        assert_eq!(snap.total_chunks, 1);
        assert_eq!(snap.chunks_per_second, 0.0);
        assert_eq!(snap.bytes_per_second, 0.0);
        assert!((snap.average_chunk_size - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_rates() {
        let mut stats = ThroughputStats::new();
        stats.reset(ms(0));
        for i in 1..=4 {
            stats.record(&chunk("0123456789"), ms(i * 250));
        }

        let snap = stats.snapshot(ms(1000));
        assert_eq!(snap.total_bytes, 40);
        assert_eq!(snap.duration, ms(1000));
        assert!((snap.chunks_per_second - 4.0).abs() < 1e-9);
        assert!((snap.bytes_per_second - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_stats_live_duration_tracks_now() {
        let mut stats = ThroughputStats::new();
        stats.reset(ms(0));
        stats.record(&chunk("x"), ms(100));

        assert_eq!(stats.snapshot(ms(100)).duration, ms(100));
        assert_eq!(stats.snapshot(ms(2000)).duration, ms(2000));
    }

    #[test]
    fn test_stats_freeze() {
        let mut stats = ThroughputStats::new();
        stats.reset(ms(0));
        stats.record(&chunk("xy"), ms(100));
        stats.freeze(ms(500));

        assert!(!stats.record(&chunk("late"), ms(600)));
        stats.freeze(ms(900));

        let snap = stats.snapshot(ms(5000));
        assert_eq!(snap.total_chunks, 1);
        assert_eq!(snap.duration, ms(500));
        assert_eq!(snap.end_time, Some(ms(500)));
    }

    #[test]
    fn test_stats_reset_unfreezes() {
        let mut stats = ThroughputStats::new();
        stats.reset(ms(0));
        stats.freeze(ms(10));
        stats.reset(ms(20));

        assert!(!stats.is_frozen());
        assert!(stats.record(&chunk("a"), ms(30)));
        assert_eq!(stats.total_chunks(), 1);
    }

    proptest! {
        #[test]
        fn total_bytes_is_sum_of_lengths(payloads in proptest::collection::vec(".{0,40}", 0..32)) {
            let mut stats = ThroughputStats::new();
            stats.reset(Duration::ZERO);
            let mut expected = 0u64;
            for (i, payload) in payloads.iter().enumerate() {
                stats.record(&chunk(payload), ms(i as u64 * 10));
                expected += payload.len() as u64;
                prop_assert_eq!(stats.total_bytes(), expected);
            }

            let snap = stats.snapshot(ms(1000));
            prop_assert!(snap.chunks_per_second >= 0.0);
            prop_assert!(snap.bytes_per_second.is_finite());
        }
    }
}
