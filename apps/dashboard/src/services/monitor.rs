//! Current stats snapshot and its update stream.
//!
//! The monitor owns the single "current report". Every inbound message,
//! polled or pushed, is decoded into a fresh [`StatsReport`] that replaces
//! the previous one wholesale. A message that fails to decode is dropped and
//! the previous snapshot stays visible.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rclone_stats::{decode_stats, decode_stats_strict, StatsReport};
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::rclone::StatsSource;
use crate::config::RcloneConfig;

/// Update pushed to subscribers.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// A new snapshot replaced the previous one.
    Report(Arc<StatsReport>),
    /// The stats source became reachable or unreachable.
    Connection { connected: bool },
}

pub struct StatsMonitor {
    snapshot: RwLock<Option<Arc<StatsReport>>>,
    connected: AtomicBool,
    strict: bool,
    event_tx: broadcast::Sender<MonitorEvent>,
}

impl StatsMonitor {
    /// Create a monitor with no snapshot.
    ///
    /// With `strict` set, payloads missing required fields are rejected
    /// instead of being shown with NaN values.
    pub fn new(strict: bool) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            snapshot: RwLock::new(None),
            connected: AtomicBool::new(false),
            strict,
            event_tx,
        }
    }

    pub fn new_shared(strict: bool) -> Arc<Self> {
        Arc::new(Self::new(strict))
    }

    /// Decode a raw `core/stats` message and make it the current snapshot.
    ///
    /// On a decode error the current snapshot is left untouched and the error
    /// is returned to the caller.
    pub async fn publish(&self, json: &str) -> rclone_stats::Result<Arc<StatsReport>> {
        let decoded = if self.strict {
            decode_stats_strict(json)
        } else {
            decode_stats(json)
        };

        let report = match decoded {
            Ok(report) => Arc::new(report),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping undecodable stats message");
                return Err(e);
            }
        };

        *self.snapshot.write().await = Some(Arc::clone(&report));

        tracing::debug!(
            transferring = report.transferring.len(),
            checking = report.checking.len(),
            "Stats snapshot replaced"
        );

        if self
            .event_tx
            .send(MonitorEvent::Report(Arc::clone(&report)))
            .is_err()
        {
            tracing::trace!("No subscribers for stats updates");
        }

        Ok(report)
    }

    /// Publish a message pushed by a relay.
    ///
    /// A pushed report that decodes proves the stats stream is alive, so the
    /// source is marked connected.
    pub async fn push(&self, json: &str) -> rclone_stats::Result<Arc<StatsReport>> {
        let report = self.publish(json).await?;
        self.set_connected(true);
        Ok(report)
    }

    /// The most recent report, if any message has been decoded yet.
    pub async fn snapshot(&self) -> Option<Arc<StatsReport>> {
        self.snapshot.read().await.clone()
    }

    /// Whether the last poll of the stats source succeeded.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Record source reachability, notifying subscribers on change.
    pub fn set_connected(&self, connected: bool) {
        let previous = self.connected.swap(connected, Ordering::Relaxed);
        if previous == connected {
            return;
        }

        if connected {
            tracing::info!("Stats source connected");
        } else {
            tracing::warn!("Stats source disconnected");
        }

        let _ = self.event_tx.send(MonitorEvent::Connection { connected });
    }

    /// Subscribe to snapshot and connection updates.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.event_tx.subscribe()
    }

    /// Fetch one message from `source` and publish it.
    pub async fn poll_once(&self, source: &dyn StatsSource) {
        match source.fetch_stats().await {
            Ok(body) => {
                self.set_connected(true);
                // Decode failures are logged by publish; the snapshot stays
                let _ = self.publish(&body).await;
            }
            Err(e) => {
                if self.is_connected() {
                    tracing::warn!(error = %e, "Failed to fetch rclone stats");
                } else {
                    tracing::debug!(error = %e, "Failed to fetch rclone stats");
                }
                self.set_connected(false);
            }
        }
    }

    /// Start polling according to `config`.
    ///
    /// Returns `None` when polling is disabled or there is no source to poll;
    /// stats then only arrive through pushes.
    pub fn start_polling(
        self: &Arc<Self>,
        source: Option<Arc<dyn StatsSource>>,
        config: &RcloneConfig,
    ) -> Option<JoinHandle<()>> {
        match (source, config.poll) {
            (_, false) => {
                tracing::info!("Polling disabled, waiting for stats on POST /api/stats");
                None
            }
            (None, true) => {
                tracing::warn!(
                    url = %config.url,
                    "Polling enabled but no rclone client is available, stats will only arrive on POST /api/stats"
                );
                None
            }
            (Some(source), true) => Some(
                self.spawn_poller(source, Duration::from_millis(config.poll_interval_ms)),
            ),
        }
    }

    /// Spawn a background task polling `source` every `interval`.
    pub fn spawn_poller(
        self: &Arc<Self>,
        source: Arc<dyn StatsSource>,
        interval: Duration,
    ) -> JoinHandle<()> {
        let monitor = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(interval_ms = interval.as_millis() as u64, "Stats poller started");

            loop {
                ticker.tick().await;
                monitor.poll_once(source.as_ref()).await;
            }
        })
    }
}
