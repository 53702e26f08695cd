//! Shared aggregation store for measured calls
//!
//! One [`ProfilingState`] belongs to one [`Profiler`](crate::Profiler) and is
//! shared by every proxy it creates. Totals only ever grow: there is no
//! removal and no reset.

use crate::method::MethodKey;
use crate::report;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::{self, Write};
use std::time::Duration;

/// Aggregate for a single method key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MethodStats {
    /// Number of measured calls recorded
    pub calls: u64,
    /// Sum of elapsed wall-clock time across those calls
    pub total: Duration,
}

/// Thread-safe map from method key to accumulated timing
#[derive(Debug, Default)]
pub struct ProfilingState {
    data: Mutex<HashMap<MethodKey, MethodStats>>,
}

impl ProfilingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one measured call to the total for `key`
    pub fn record(&self, key: MethodKey, elapsed: Duration) {
        let mut data = self.data.lock();
        let entry = data.entry(key).or_default();
        entry.calls += 1;
        entry.total = entry.total.saturating_add(elapsed);
    }

    /// Current aggregate for `key`, if it was ever recorded
    pub fn stats(&self, key: &MethodKey) -> Option<MethodStats> {
        self.data.lock().get(key).copied()
    }

    /// Consistent copy of every entry, in report order
    pub fn snapshot(&self) -> Vec<(MethodKey, MethodStats)> {
        let mut entries: Vec<_> = self
            .data
            .lock()
            .iter()
            .map(|(key, stats)| (*key, *stats))
            .collect();
        entries.sort_by(|a, b| a.0.report_cmp(&b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }

    /// Write one line per key, sorted by method name
    ///
    /// The lock is released before any output happens, so a slow writer
    /// never blocks recording threads.
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        for (key, stats) in self.snapshot() {
            report::write_entry(writer, &key, &stats)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::MethodSignature;
    use std::sync::Arc;
    use std::thread;

    struct Downloader;
    struct Indexer;

    static DOWNLOAD: MethodSignature = MethodSignature::new("download", &["&str"], true);
    static INDEX: MethodSignature = MethodSignature::new("index", &["Vec<String>"], true);
    static ANALYZE: MethodSignature = MethodSignature::new("analyze", &[], true);

    #[test]
    fn test_state_starts_empty() {
        let state = ProfilingState::new();
        assert!(state.is_empty());
        assert_eq!(state.len(), 0);
        assert!(state.snapshot().is_empty());
    }

    #[test]
    fn test_record_accumulates_per_key() {
        let state = ProfilingState::new();
        let key = MethodKey::of::<Downloader>(&DOWNLOAD);

        state.record(key, Duration::from_millis(100));
        state.record(key, Duration::from_millis(250));
        state.record(MethodKey::of::<Indexer>(&INDEX), Duration::from_millis(5));

        assert_eq!(state.len(), 2);
        assert_eq!(
            state.stats(&key),
            Some(MethodStats {
                calls: 2,
                total: Duration::from_millis(350),
            })
        );
    }

    #[test]
    fn test_record_zero_duration_still_counts_call() {
        let state = ProfilingState::new();
        let key = MethodKey::of::<Indexer>(&INDEX);
        state.record(key, Duration::ZERO);

        let stats = state.stats(&key).unwrap();
        assert_eq!(stats.calls, 1);
        assert_eq!(stats.total, Duration::ZERO);
    }

    #[test]
    fn test_record_saturates_instead_of_overflowing() {
        let state = ProfilingState::new();
        let key = MethodKey::of::<Indexer>(&INDEX);
        state.record(key, Duration::MAX);
        state.record(key, Duration::from_secs(1));

        assert_eq!(state.stats(&key).unwrap().total, Duration::MAX);
    }

    #[test]
    fn test_concurrent_record_loses_no_updates() {
        let state = Arc::new(ProfilingState::new());
        let key = MethodKey::of::<Downloader>(&DOWNLOAD);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = Arc::clone(&state);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        state.record(key, Duration::from_micros(3));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = state.stats(&key).unwrap();
        assert_eq!(stats.calls, 8000);
        assert_eq!(stats.total, Duration::from_micros(24_000));
    }

    #[test]
    fn test_write_sorted_by_method_name() {
        let state = ProfilingState::new();
        state.record(MethodKey::of::<Indexer>(&INDEX), Duration::from_secs(1));
        state.record(MethodKey::of::<Downloader>(&DOWNLOAD), Duration::from_millis(500));
        state.record(MethodKey::of::<Indexer>(&ANALYZE), Duration::from_nanos(7));

        let mut out = Vec::new();
        state.write(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("Indexer#analyze(): 0.000000007s"));
        assert!(lines[1].ends_with("Downloader#download(&str): 0.5s"));
        assert!(lines[2].ends_with("Indexer#index(Vec<String>): 1s"));
    }

    #[test]
    fn test_write_is_idempotent() {
        let state = ProfilingState::new();
        state.record(MethodKey::of::<Indexer>(&INDEX), Duration::from_secs(1));
        state.record(MethodKey::of::<Downloader>(&DOWNLOAD), Duration::from_secs(2));
        state.record(MethodKey::of::<Indexer>(&DOWNLOAD), Duration::from_secs(3));

        let mut first = Vec::new();
        let mut second = Vec::new();
        state.write(&mut first).unwrap();
        state.write(&mut second).unwrap();
        assert_eq!(first, second);
    }
}
