//! HTML views for the HTMX frontend
//!
//! Route handlers that render Askama templates. Live updates reach the
//! browser through the SSE stream in [`sse`].

pub mod dashboard;
pub mod history;
pub mod preferences;
pub mod sse;

use askama::Template;
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use crate::services::Preferences;
use crate::AppState;

#[derive(Template)]
#[template(path = "pages/404.html")]
pub struct NotFoundTemplate {
    pub prefs: Preferences,
    pub path: String,
    pub active_page: String,
}

/// 404 handler
pub async fn not_found(State(state): State<AppState>, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            prefs: state.preferences.get().await,
            path: uri.path().to_string(),
            active_page: String::new(),
        },
    )
}

/// Build the HTML routes for the frontend
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::page))
        .route("/history", get(history::page))
        .route("/preferences/theme", post(preferences::toggle_theme))
        .route("/preferences/drawer", post(preferences::toggle_drawer))
        .route("/preferences/unit", post(preferences::toggle_unit))
        .route("/sse/stats", get(sse::stats_stream))
}
