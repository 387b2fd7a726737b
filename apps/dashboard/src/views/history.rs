//! Completed transfers view

use askama::Template;
use axum::{extract::State, response::IntoResponse};
use rclone_stats::decode_transferred;

use crate::display::{history, CompletedView};
use crate::services::Preferences;
use crate::AppState;

#[derive(Template)]
#[template(path = "pages/history.html")]
pub struct HistoryTemplate {
    pub prefs: Preferences,
    pub active_page: String,
    pub entries: Vec<CompletedView>,
    pub error: Option<String>,
}

/// Render the history page.
///
/// Upstream failures are shown inline; the page itself always renders.
pub async fn page(State(state): State<AppState>) -> impl IntoResponse {
    let prefs = state.preferences.get().await;

    let (entries, error) = match state.rclone() {
        None => (Vec::new(), Some("No rclone source configured".to_string())),
        Some(source) => match source.fetch_transferred().await {
            Ok(body) => match decode_transferred(&body) {
                Ok(report) => (history(&report.transferred, prefs.unit), None),
                Err(e) => {
                    tracing::warn!(error = %e, "Invalid core/transferred response");
                    (Vec::new(), Some("rclone returned an unreadable history".to_string()))
                }
            },
            Err(e) => {
                tracing::debug!(error = %e, "Failed to fetch completed transfers");
                (Vec::new(), Some("Could not reach the rclone API".to_string()))
            }
        },
    };

    HistoryTemplate {
        prefs,
        active_page: "history".to_string(),
        entries,
        error,
    }
}
