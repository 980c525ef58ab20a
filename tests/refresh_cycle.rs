//! End-to-end refresh cycle scenarios against a fake monitor source
//!
//! Each test works in its own temporary configuration directory, exercising
//! the real cache file and token file.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use uptime_checker::cache::{CacheRecord, CacheStore};
use uptime_checker::config::Config;
use uptime_checker::credentials::TokenStore;
use uptime_checker::data::{FetchError, Monitor, MonitorSource, MonitorStatus, MonitorType};
use uptime_checker::refresh::{CacheReason, CycleOutcome, Refresher, Snapshot};

const NOW: i64 = 1_730_000_000_000;

/// Monitor source returning canned results and counting calls
#[derive(Clone)]
struct FakeSource {
    monitors: Option<Vec<Monitor>>,
    calls: Arc<AtomicUsize>,
}

impl FakeSource {
    fn returning(monitors: Vec<Monitor>) -> Self {
        Self {
            monitors: Some(monitors),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing() -> Self {
        Self {
            monitors: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl MonitorSource for FakeSource {
    async fn fetch_monitors(&self, _token: &str) -> Result<Vec<Monitor>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.monitors {
            Some(monitors) => Ok(monitors.clone()),
            None => Err(FetchError::Timeout(std::time::Duration::from_secs(30))),
        }
    }
}

fn monitor(id: u64, name: &str) -> Monitor {
    Monitor {
        id,
        status: MonitorStatus::Up,
        friendly_name: name.to_string(),
        url: format!("https://{}.example.com", name),
        average_response_time: Some(120.0),
        custom_uptime_ratio: Some("100.000".to_string()),
        monitor_type: MonitorType::Http,
        interval: 300,
        logs: Vec::new(),
        response_times: Vec::new(),
    }
}

fn refresher(dir: &TempDir, source: FakeSource) -> Refresher<FakeSource> {
    let config = Config::with_dir(dir.path().to_path_buf());
    Refresher::new(&config, "ur-token".to_string(), source)
}

#[tokio::test]
async fn scenario_a_empty_cache_successful_fetch() {
    let dir = TempDir::new().unwrap();
    let source = FakeSource::returning(vec![monitor(1, "blog"), monitor(2, "shop")]);
    let refresher = refresher(&dir, source.clone());

    let snapshot = Snapshot::from(refresher.run_cycle_at(NOW).await);

    assert_eq!(snapshot.monitors.as_ref().map(Vec::len), Some(2));
    assert!(!snapshot.using_cache);
    assert!(snapshot.error.is_none());
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);

    let saved = CacheStore::new(dir.path()).load().await;
    assert_eq!(saved.data.map(|d| d.len()), Some(2));
    assert_eq!(saved.timestamps, vec![NOW]);
}

#[tokio::test]
async fn scenario_b_rate_limited_serves_cache() {
    let dir = TempDir::new().unwrap();
    let store = CacheStore::new(dir.path());
    store
        .save(&CacheRecord {
            data: Some(vec![monitor(7, "cached")]),
            timestamps: (1..=10).map(|i| NOW - i * 5_000).collect(),
        })
        .await
        .unwrap();
    let source = FakeSource::returning(vec![monitor(1, "fresh")]);
    let refresher = refresher(&dir, source.clone());

    let outcome = refresher.run_cycle_at(NOW).await;

    assert!(matches!(
        outcome,
        CycleOutcome::Cached {
            reason: CacheReason::RateLimited,
            ..
        }
    ));
    let snapshot = Snapshot::from(outcome);
    assert_eq!(snapshot.monitors.unwrap()[0].id, 7);
    assert!(snapshot.using_cache);
    assert_eq!(source.calls.load(Ordering::SeqCst), 0, "No network call");
}

#[tokio::test]
async fn scenario_c_fetch_fails_without_cache() {
    let dir = TempDir::new().unwrap();
    let refresher = refresher(&dir, FakeSource::failing());

    let snapshot = Snapshot::from(refresher.run_cycle_at(NOW).await);

    assert!(snapshot.monitors.is_none());
    assert!(!snapshot.using_cache);
    let error = snapshot.error.expect("Should carry a user-visible error");
    assert!(error.contains("no cached data available"), "Unexpected: {}", error);
}

#[tokio::test]
async fn scenario_d_stale_timestamps_allow_fetch() {
    let dir = TempDir::new().unwrap();
    let store = CacheStore::new(dir.path());
    store
        .save(&CacheRecord {
            data: Some(vec![monitor(3, "old")]),
            timestamps: vec![NOW - 61_000, NOW - 90_000, NOW - 3_600_000],
        })
        .await
        .unwrap();
    let source = FakeSource::returning(vec![monitor(4, "new")]);
    let refresher = refresher(&dir, source.clone());

    let outcome = refresher.run_cycle_at(NOW).await;

    assert_eq!(source.calls.load(Ordering::SeqCst), 1, "Fetch attempted");
    assert_eq!(outcome, CycleOutcome::Fresh(vec![monitor(4, "new")]));
    assert_eq!(store.load().await.timestamps, vec![NOW]);
}

#[tokio::test]
async fn scenario_d_stale_timestamps_then_failure_uses_cache() {
    let dir = TempDir::new().unwrap();
    let store = CacheStore::new(dir.path());
    store
        .save(&CacheRecord {
            data: Some(vec![monitor(3, "old")]),
            timestamps: vec![NOW - 61_000, NOW - 90_000, NOW - 3_600_000],
        })
        .await
        .unwrap();
    let source = FakeSource::failing();
    let refresher = refresher(&dir, source.clone());

    let snapshot = Snapshot::from(refresher.run_cycle_at(NOW).await);

    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert!(snapshot.using_cache);
    assert_eq!(snapshot.monitors.unwrap()[0].id, 3);
}

#[tokio::test]
async fn scenario_e_new_explicit_token_is_persisted() {
    let dir = TempDir::new().unwrap();
    let tokens = TokenStore::new(dir.path(), None);
    tokens.save("ur-old").await.unwrap();

    assert_eq!(tokens.resolve(Some("ur-new")).await.unwrap(), "ur-new");
    assert_eq!(tokens.read().await.as_deref(), Some("ur-new"));

    // A later run without --token picks up the new value
    let later = TokenStore::new(dir.path(), Some("ur-env".to_string()));
    assert_eq!(later.resolve(None).await.unwrap(), "ur-new");
}

#[tokio::test]
async fn eleventh_call_in_window_is_rate_limited() {
    let dir = TempDir::new().unwrap();
    let source = FakeSource::returning(vec![monitor(1, "blog")]);
    let refresher = refresher(&dir, source.clone());

    for i in 0..10 {
        let outcome = refresher.run_cycle_at(NOW + i * 1_000).await;
        assert!(!outcome.using_cache(), "Call {} should hit the API", i + 1);
    }

    let outcome = refresher.run_cycle_at(NOW + 10_000).await;
    assert!(outcome.using_cache());
    assert_eq!(source.calls.load(Ordering::SeqCst), 10);

    // Once the first call leaves the window, the API is used again
    let outcome = refresher.run_cycle_at(NOW + 60_001).await;
    assert!(!outcome.using_cache());
    assert_eq!(source.calls.load(Ordering::SeqCst), 11);
}

#[tokio::test]
async fn corrupt_cache_file_behaves_like_empty_cache() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("cache.json"), "{\"data\": [1, 2").unwrap();
    let refresher = refresher(&dir, FakeSource::failing());

    let outcome = refresher.run_cycle_at(NOW).await;

    assert!(matches!(outcome, CycleOutcome::Failed(_)));
}
