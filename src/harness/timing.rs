//! Request timing metrics.
//!
//! Aggregates dispatch durations across a run so slow endpoints show up in
//! the closing summary.

use std::sync::atomic::{AtomicU64, Ordering};

use super::DurationRecorder;

/// Aggregated request durations, safe to share across tasks.
#[derive(Debug)]
pub struct TransactionStats {
    /// Number of recorded requests.
    count: AtomicU64,
    /// Sum of all durations in milliseconds.
    total_ms: AtomicU64,
    /// Fastest recorded duration; `u64::MAX` until the first record.
    min_ms: AtomicU64,
    /// Slowest recorded duration.
    max_ms: AtomicU64,
}

impl TransactionStats {
    /// Creates an empty aggregate.
    pub fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            total_ms: AtomicU64::new(0),
            min_ms: AtomicU64::new(u64::MAX),
            max_ms: AtomicU64::new(0),
        }
    }

    /// Records one request duration.
    pub fn record(&self, millis: u64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total_ms.fetch_add(millis, Ordering::Relaxed);
        self.min_ms.fetch_min(millis, Ordering::Relaxed);
        self.max_ms.fetch_max(millis, Ordering::Relaxed);
    }

    /// Number of recorded requests.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Average duration in milliseconds, zero when nothing was recorded.
    pub fn average_ms(&self) -> u64 {
        let count = self.count.load(Ordering::Relaxed);
        if count == 0 {
            return 0;
        }
        self.total_ms.load(Ordering::Relaxed) / count
    }

    /// Logs a summary of the recorded durations.
    pub fn log_summary(&self) {
        let count = self.count.load(Ordering::Relaxed);
        if count == 0 {
            log::info!("No request timing data collected");
            return;
        }
        log::info!("=== Request Timing Summary ({count} requests) ===");
        log::info!("  Average: {:>6} ms", self.average_ms());
        log::info!("  Fastest: {:>6} ms", self.min_ms.load(Ordering::Relaxed));
        log::info!("  Slowest: {:>6} ms", self.max_ms.load(Ordering::Relaxed));
        log::info!("  Total:   {:>6} ms", self.total_ms.load(Ordering::Relaxed));
    }
}

impl Default for TransactionStats {
    fn default() -> Self {
        Self::new()
    }
}

impl DurationRecorder for TransactionStats {
    fn record_duration(&self, millis: u64) {
        self.record(millis);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_are_empty() {
        let stats = TransactionStats::new();
        assert_eq!(stats.count(), 0);
        assert_eq!(stats.average_ms(), 0);
    }

    #[test]
    fn test_record_single() {
        let stats = TransactionStats::new();
        stats.record(120);
        assert_eq!(stats.count(), 1);
        assert_eq!(stats.average_ms(), 120);
        assert_eq!(stats.min_ms.load(Ordering::Relaxed), 120);
        assert_eq!(stats.max_ms.load(Ordering::Relaxed), 120);
    }

    #[test]
    fn test_record_multiple_tracks_extremes() {
        let stats = TransactionStats::new();
        stats.record(100);
        stats.record(300);
        stats.record(200);
        assert_eq!(stats.count(), 3);
        assert_eq!(stats.average_ms(), 200);
        assert_eq!(stats.min_ms.load(Ordering::Relaxed), 100);
        assert_eq!(stats.max_ms.load(Ordering::Relaxed), 300);
    }

    #[test]
    fn test_recorder_trait_feeds_stats() {
        let stats = TransactionStats::new();
        let recorder: &dyn DurationRecorder = &stats;
        recorder.record_duration(42);
        assert_eq!(stats.count(), 1);
    }

    #[test]
    fn test_log_summary_empty_does_not_panic() {
        TransactionStats::new().log_summary();
    }
}
