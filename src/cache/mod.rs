//! Local response cache with time-windowed request accounting
//!
//! The cache file holds the last known good monitor list together with the
//! timestamps of recent API calls. Timestamps are pruned lazily against a
//! trailing window each time the record is used, so the rate limit survives
//! process restarts without any background timer.

mod store;
mod window;

pub use store::{CacheRecord, CacheStore, CACHE_FILE_NAME};
pub use window::{is_limited, now_millis, prune, record};
