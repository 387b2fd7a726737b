//! JSON API endpoint handlers.

pub mod preferences;
pub mod stats;
pub mod transferred;
pub mod ws;

use axum::{routing::get, Router};

use crate::AppState;

/// Routes nested under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats::get_stats).post(stats::push_stats))
        .route("/stats/formatted", get(stats::get_formatted))
        .route("/transferred", get(transferred::list_transferred))
        .route(
            "/preferences",
            get(preferences::get_preferences).put(preferences::update_preferences),
        )
        .route("/ws", get(ws::ws_handler))
}
