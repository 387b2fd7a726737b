use anyhow::Context;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dashboard::{config, services, AppState};

use config::Config;
use services::{Preferences, PreferencesStore, RcloneClient, StatsMonitor, StatsSource};

fn init_tracing() {
    // RUST_LOG overrides; default is debug for our crates, info for axum
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("dashboard=debug,rclone_stats=info,tower_http=debug,axum=info,warn")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Tracing first so configuration loading is logged
    init_tracing();

    tracing::info!("Starting rclone web progress v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded successfully");
    tracing::debug!("Server: {}:{}", config.server.host, config.server.port);
    tracing::debug!("Rclone: {:?}", config.rclone);

    let preferences = PreferencesStore::load_shared(
        &config.preferences.path,
        Preferences {
            unit: config.display.unit,
            ..Default::default()
        },
    )
    .await
    .context("Failed to load preferences")?;
    tracing::info!(path = ?preferences.path(), "Preferences ready");

    let monitor = StatsMonitor::new_shared(config.rclone.strict);

    let rclone: Option<Arc<dyn StatsSource>> = match RcloneClient::new_shared(&config.rclone) {
        Ok(client) => {
            tracing::info!(url = %client.base_url(), "rclone rc client initialized");
            Some(client as Arc<dyn StatsSource>)
        }
        Err(e) => {
            tracing::warn!("rclone rc client unavailable: {}", e);
            None
        }
    };

    let poller = monitor.start_polling(rclone.clone(), &config.rclone);

    let addr = config.server_addr();
    let state = AppState {
        config: Arc::new(config),
        monitor,
        preferences,
        rclone,
        start_time: Instant::now(),
    };

    let app = dashboard::router(state);

    tracing::info!("Dashboard listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(poller) = poller {
        poller.abort();
    }

    Ok(())
}
