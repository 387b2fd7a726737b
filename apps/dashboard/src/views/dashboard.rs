//! Dashboard view

use askama::Template;
use axum::{extract::State, response::IntoResponse};

use crate::display::{StatsView, StatusView, TransferView};
use crate::services::Preferences;
use crate::AppState;

#[derive(Template)]
#[template(path = "pages/dashboard.html")]
pub struct DashboardTemplate {
    pub prefs: Preferences,
    pub active_page: String,
    pub version: String,
    pub status: StatusView,
    pub transfers: Vec<TransferView>,
    pub checking: Vec<String>,
}

/// Render the dashboard page
pub async fn page(State(state): State<AppState>) -> impl IntoResponse {
    let prefs = state.preferences.get().await;
    let report = state.monitor.snapshot().await;

    let StatsView {
        status,
        transfers,
        checking,
    } = StatsView::new(report.as_deref(), state.monitor.is_connected(), prefs.unit);

    DashboardTemplate {
        prefs,
        active_page: "dashboard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status,
        transfers,
        checking,
    }
}
