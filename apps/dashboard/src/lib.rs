//! rclone web progress dashboard
//!
//! Serves a live view of an rclone process' transfers. Stats are polled from
//! the rclone rc API (or pushed to `POST /api/stats`), decoded by the
//! `rclone_stats` crate and rendered as HTML, SSE fragments and JSON.
//! This library exposes modules for use in integration tests.

use axum::{
    http::{header, HeaderValue, Method},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod services;
pub mod static_files;
pub mod views;

use config::Config;
use services::{PreferencesStore, StatsMonitor, StatsSource};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub monitor: Arc<StatsMonitor>,
    pub preferences: Arc<PreferencesStore>,
    pub rclone: Option<Arc<dyn StatsSource>>,
    pub start_time: Instant,
}

impl AppState {
    /// Get a reference to the stats source, if one is configured.
    pub fn rclone(&self) -> Option<&dyn StatsSource> {
        self.rclone.as_deref()
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub message: String,
    pub version: String,
    pub uptime_seconds: u64,
}

pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "rclone web progress is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime().as_secs(),
    })
}

/// CORS layer from the configured origins. No origins means same-origin only.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        tracing::info!("CORS: No origins configured, same-origin only");
        return cors;
    }

    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    tracing::info!("CORS: Allowing origins {:?}", origins);
    cors.allow_origin(AllowOrigin::list(parsed))
}

/// Build the complete application router.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .route("/static/*path", get(static_files::serve_static))
        .nest("/api", api::routes())
        .merge(views::routes())
        .fallback(views::not_found)
        .layer(cors)
        .with_state(state)
}
