//! Persisted UI preference endpoints.

use axum::{extract::State, Json};
use rclone_stats::BaseUnit;
use serde::Deserialize;

use crate::error::Result;
use crate::services::Preferences;
use crate::AppState;

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePreferences {
    pub dark_mode: Option<bool>,
    pub drawer_open: Option<bool>,
    pub unit: Option<BaseUnit>,
}

/// GET /api/preferences
pub async fn get_preferences(State(state): State<AppState>) -> Json<Preferences> {
    Json(state.preferences.get().await)
}

/// PUT /api/preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    Json(update): Json<UpdatePreferences>,
) -> Result<Json<Preferences>> {
    let preferences = state
        .preferences
        .update(|p| {
            if let Some(dark_mode) = update.dark_mode {
                p.dark_mode = dark_mode;
            }
            if let Some(drawer_open) = update.drawer_open {
                p.drawer_open = drawer_open;
            }
            if let Some(unit) = update.unit {
                p.unit = unit;
            }
        })
        .await?;

    tracing::info!(?preferences, "Preferences updated");
    Ok(Json(preferences))
}
