//! Test infrastructure for dashboard integration tests.
//!
//! Provides a `TestApp` wrapper around `axum_test::TestServer` backed by a
//! scripted stats source and a throwaway preferences file.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use std::sync::Arc;
use std::time::Instant;
use tempfile::TempDir;

use dashboard::config::{Config, PreferencesConfig};
use dashboard::error::{AppError, Result};
use dashboard::services::{Preferences, PreferencesStore, StatsMonitor, StatsSource};
use dashboard::AppState;

pub const STATS: &str = r#"{
    "speed": 1500000, "bytes": 163679406, "errors": 0,
    "fatalError": false, "retryError": false,
    "checks": 4, "transfers": 1, "deletes": 0, "renames": 0,
    "transferTime": 3725, "elapsedTime": 90061,
    "lastError": null,
    "transferring": [{
        "bytes": 163679406, "eta": 45, "name": "movies/big <file>.mkv",
        "percentage": 42, "speed": 3432125, "speedAvg": 23523, "size": 937912872
    }],
    "checking": ["docs/readme.txt"]
}"#;

pub const TRANSFERRED: &str = r#"{"transferred": [
    {"name": "first.bin", "size": 1000, "bytes": 1000, "checked": false,
     "started_at": "2024-03-01T10:00:00Z", "completed_at": "2024-03-01T10:01:30Z",
     "error": "", "jobid": 1, "group": "job/1"},
    {"name": "second.bin", "size": 2000000, "bytes": 2000000, "checked": false,
     "started_at": "2024-03-01T11:00:00Z", "completed_at": "2024-03-01T11:00:05Z",
     "error": "", "jobid": 1, "group": "job/1"}
]}"#;

/// Stats source answering with fixed bodies, or failing when `None`.
pub struct FakeSource {
    pub stats: Option<String>,
    pub transferred: Option<String>,
}

impl FakeSource {
    pub fn online() -> Self {
        Self {
            stats: Some(STATS.to_string()),
            transferred: Some(TRANSFERRED.to_string()),
        }
    }

    pub fn offline() -> Self {
        Self {
            stats: None,
            transferred: None,
        }
    }
}

#[async_trait]
impl StatsSource for FakeSource {
    async fn fetch_stats(&self) -> Result<String> {
        self.stats
            .clone()
            .ok_or_else(|| AppError::Upstream("connection refused".to_string()))
    }

    async fn fetch_transferred(&self) -> Result<String> {
        self.transferred
            .clone()
            .ok_or_else(|| AppError::Upstream("connection refused".to_string()))
    }
}

/// Test application wrapper around axum_test::TestServer.
pub struct TestApp {
    server: TestServer,
    state: AppState,
    _dir: TempDir,
}

impl TestApp {
    /// Create a test application backed by an online fake source.
    pub async fn new() -> Self {
        Self::with_source(Some(Arc::new(FakeSource::online()))).await
    }

    /// Create a test application with the given stats source.
    ///
    /// Nothing polls in tests; snapshots arrive through `POST /api/stats`
    /// or [`TestApp::poll`].
    pub async fn with_source(source: Option<Arc<dyn StatsSource>>) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let config = Config {
            server: Default::default(),
            rclone: Default::default(),
            display: Default::default(),
            preferences: PreferencesConfig {
                path: dir.path().join("preferences.json"),
            },
        };

        let preferences =
            PreferencesStore::load_shared(&config.preferences.path, Preferences::default())
                .await
                .expect("Failed to load preferences");

        let state = AppState {
            config: Arc::new(config),
            monitor: StatsMonitor::new_shared(false),
            preferences,
            rclone: source,
            start_time: Instant::now(),
        };

        let server =
            TestServer::new(dashboard::router(state.clone())).expect("Failed to create test server");

        Self {
            server,
            state,
            _dir: dir,
        }
    }

    /// Get a reference to the test server.
    pub fn server(&self) -> &TestServer {
        &self.server
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run one poll against the configured source.
    pub async fn poll(&self) {
        if let Some(source) = self.state.rclone() {
            self.state.monitor.poll_once(source).await;
        }
    }

    /// Push the sample stats payload.
    pub async fn push_sample(&self) {
        self.server
            .post("/api/stats")
            .text(STATS)
            .await
            .assert_status(axum::http::StatusCode::ACCEPTED);
    }
}
