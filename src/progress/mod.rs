//! Progress tracking against an optional known total.

use serde::Serialize;

/// Point-in-time view of a [`ProgressTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Progress {
    /// Units completed.
    pub current: u64,
    /// Units expected, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// `current / total * 100`, when the total is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

impl Progress {
    /// Completion in `0.0..=1.0`, when the total is known.
    #[allow(clippy::cast_possible_truncation)]
    pub fn fraction(&self) -> Option<f32> {
        self.percentage.map(|p| (p / 100.0) as f32)
    }
}

/// Tracks `current` against an optional `total`.
///
/// Progress is never derived from chunk counts on its own; it moves only
/// through explicit calls (or progress chunks routed here by the engine).
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    current: u64,
    total: Option<u64>,
}

impl ProgressTracker {
    /// Create a tracker at zero with no known total.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or update the known total. `current` is clamped into range.
    pub fn set_total(&mut self, total: u64) {
        self.total = Some(total);
        self.current = self.current.min(total);
    }

    /// Move forward by `by`, stopping at the total if known.
    pub fn advance(&mut self, by: u64) {
        let next = self.current.saturating_add(by);
        self.current = self.total.map_or(next, |total| next.min(total));
    }

    /// Jump to `to`, clamped into `[0, total]` when the total is known.
    pub fn seek(&mut self, to: u64) {
        self.current = self.total.map_or(to, |total| to.min(total));
    }

    /// Back to zero, keeping the total.
    pub fn rewind(&mut self) {
        self.current = 0;
    }

    /// Back to zero with no total.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Units completed.
    pub const fn current(&self) -> u64 {
        self.current
    }

    /// Known total, if any.
    pub const fn total(&self) -> Option<u64> {
        self.total
    }

    /// Whether a total is known and has been reached.
    pub fn is_complete(&self) -> bool {
        self.total.is_some_and(|total| self.current >= total)
    }

    /// Snapshot with the derived percentage.
    #[allow(clippy::cast_precision_loss)]
    pub fn snapshot(&self) -> Progress {
        let percentage = self.total.map(|total| {
            if total == 0 {
                100.0
            } else {
                self.current as f64 / total as f64 * 100.0
            }
        });
        Progress {
            current: self.current,
            total: self.total,
            percentage,
        }
    }
}

/// Parse a progress report: `"7"`, `"7/20"` or `"35%"`.
///
/// Returns `(current, total)`. A percentage is reported against a total of 100.
pub fn parse_progress(text: &str) -> Option<(u64, Option<u64>)> {
    let text = text.trim();
    if let Some(pct) = text.strip_suffix('%') {
        let current = pct.trim().parse().ok()?;
        return Some((current, Some(100)));
    }
    match text.split_once('/') {
        Some((current, total)) => Some((current.trim().parse().ok()?, Some(total.trim().parse().ok()?))),
        None => Some((text.parse().ok()?, None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_without_total() {
        let mut tracker = ProgressTracker::new();
        tracker.advance(5);
        tracker.seek(1000);

        let snap = tracker.snapshot();
        assert_eq!(snap.current, 1000);
        assert_eq!(snap.total, None);
        assert_eq!(snap.percentage, None);
        assert!(!tracker.is_complete());
    }

    #[test]
    fn test_progress_advance_clamps() {
        let mut tracker = ProgressTracker::new();
        tracker.set_total(10);
        tracker.advance(4);
        assert_eq!(tracker.snapshot().percentage, Some(40.0));

        tracker.advance(100);
        assert_eq!(tracker.current(), 10);
        assert!(tracker.is_complete());
    }

    #[test]
    fn test_progress_set_total_recomputes() {
        let mut tracker = ProgressTracker::new();
        tracker.advance(30);
        tracker.set_total(60);
        assert_eq!(tracker.snapshot().percentage, Some(50.0));

        tracker.set_total(20);
        assert_eq!(tracker.current(), 20);
    }

    #[test]
    fn test_progress_seek_clamps() {
        let mut tracker = ProgressTracker::new();
        tracker.set_total(8);
        tracker.seek(3);
        assert_eq!(tracker.current(), 3);
        tracker.seek(99);
        assert_eq!(tracker.current(), 8);
    }

    #[test]
    fn test_progress_zero_total() {
        let mut tracker = ProgressTracker::new();
        tracker.set_total(0);
        assert_eq!(tracker.snapshot().percentage, Some(100.0));
    }

    #[test]
    fn test_progress_reset() {
        let mut tracker = ProgressTracker::new();
        tracker.set_total(4);
        tracker.advance(2);
        tracker.rewind();
        assert_eq!(tracker.snapshot().total, Some(4));

        tracker.reset();
        assert_eq!(tracker.snapshot(), Progress::default());
    }

    #[test]
    fn test_parse_progress() {
        assert_eq!(parse_progress("7"), Some((7, None)));
        assert_eq!(parse_progress(" 7 / 20 "), Some((7, Some(20))));
        assert_eq!(parse_progress("35%"), Some((35, Some(100))));
        assert_eq!(parse_progress("loading"), None);
        assert_eq!(parse_progress("3/x"), None);
    }
}
