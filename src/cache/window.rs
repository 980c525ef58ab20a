//! Sliding-window request accounting over a `CacheRecord`

use chrono::Utc;

use super::CacheRecord;
use crate::data::Monitor;

/// Current time in epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Drops timestamps that fall outside the trailing window
///
/// A timestamp `t` is kept only when `now - window_ms < t`.
pub fn prune(mut record: CacheRecord, now: i64, window_ms: i64) -> CacheRecord {
    let cutoff = now - window_ms;
    record.timestamps.retain(|&t| t > cutoff);
    record
}

/// True when the record already holds `max_requests` calls or more
///
/// Expects a record that has been pruned for the current time.
pub fn is_limited(record: &CacheRecord, max_requests: usize) -> bool {
    record.timestamps.len() >= max_requests
}

/// Accounts for a successful call at `now` and replaces the cached dataset
pub fn record(mut record: CacheRecord, now: i64, monitors: Vec<Monitor>) -> CacheRecord {
    record.timestamps.push(now);
    record.data = Some(monitors);
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::monitor;

    const WINDOW: i64 = 60_000;

    fn with_timestamps(timestamps: Vec<i64>) -> CacheRecord {
        CacheRecord {
            data: None,
            timestamps,
        }
    }

    #[test]
    fn test_prune_removes_old_timestamps() {
        let now = 1_000_000;
        let record = with_timestamps(vec![now - 120_000, now - 60_001, now - 59_999, now - 1]);

        let pruned = prune(record, now, WINDOW);

        assert_eq!(pruned.timestamps, vec![now - 59_999, now - 1]);
    }

    #[test]
    fn test_prune_boundary_is_exclusive() {
        let now = 1_000_000;
        let pruned = prune(with_timestamps(vec![now - WINDOW]), now, WINDOW);

        assert!(pruned.timestamps.is_empty(), "t == now - window is outside");
    }

    #[test]
    fn test_prune_is_idempotent() {
        let now = 5_000_000;
        let record = with_timestamps(vec![10, now - 70_000, now - 30_000, now - 5, now]);

        let once = prune(record, now, WINDOW);
        let twice = prune(once.clone(), now, WINDOW);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_prune_retains_only_window_entries() {
        let now = 9_000_000;
        let timestamps: Vec<i64> = (0..200).map(|i| now - i * 997).collect();

        let pruned = prune(with_timestamps(timestamps), now, WINDOW);

        assert!(!pruned.timestamps.is_empty());
        assert!(pruned.timestamps.iter().all(|&t| now - WINDOW < t));
    }

    #[test]
    fn test_prune_keeps_data() {
        let record = CacheRecord {
            data: Some(vec![monitor(1, "kept")]),
            timestamps: vec![0],
        };

        let pruned = prune(record, 1_000_000, WINDOW);

        assert!(pruned.timestamps.is_empty());
        assert_eq!(pruned.data.map(|d| d.len()), Some(1));
    }

    #[test]
    fn test_is_limited_boundary() {
        let at_max = with_timestamps(vec![1; 10]);
        let below_max = with_timestamps(vec![1; 9]);
        let above_max = with_timestamps(vec![1; 11]);

        assert!(is_limited(&at_max, 10));
        assert!(!is_limited(&below_max, 10));
        assert!(is_limited(&above_max, 10));
        assert!(!is_limited(&CacheRecord::default(), 10));
    }

    #[test]
    fn test_record_appends_and_replaces_data() {
        let existing = CacheRecord {
            data: Some(vec![monitor(1, "old")]),
            timestamps: vec![100],
        };

        let updated = record(existing, 200, vec![monitor(2, "new"), monitor(3, "newer")]);

        assert_eq!(updated.timestamps, vec![100, 200]);
        let data = updated.data.expect("Data should be replaced");
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].id, 2);
    }
}
