//! Current stats snapshot endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use rclone_stats::{BaseUnit, StatsReport};
use serde::{Deserialize, Serialize};

use crate::display::StatsView;
use crate::error::{AppError, Result};
use crate::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub connected: bool,
    pub report: StatsReport,
}

#[derive(Debug, Serialize)]
pub struct PushResponse {
    pub transferring: usize,
    pub checking: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct FormatQuery {
    /// Overrides the stored unit preference.
    pub unit: Option<BaseUnit>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/stats
///
/// The current typed report. 404 until the first message has been decoded.
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let report = state
        .monitor
        .snapshot()
        .await
        .ok_or_else(|| AppError::NotFound("No stats received yet".to_string()))?;

    Ok(Json(StatsResponse {
        connected: state.monitor.is_connected(),
        report: (*report).clone(),
    }))
}

/// POST /api/stats
///
/// Push a raw `core/stats` payload. A payload that fails to decode is
/// rejected with 400 and the previous snapshot stays current. An accepted
/// payload marks the stats source connected.
pub async fn push_stats(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<PushResponse>)> {
    let report = state.monitor.push(&body).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(PushResponse {
            transferring: report.transferring.len(),
            checking: report.checking.len(),
        }),
    ))
}

/// GET /api/stats/formatted
///
/// The current snapshot rendered for display. Without a snapshot every
/// status field reads `N/A` and the transfer list is empty.
pub async fn get_formatted(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
) -> Json<StatsView> {
    let unit = match query.unit {
        Some(unit) => unit,
        None => state.preferences.get().await.unit,
    };
    let report = state.monitor.snapshot().await;

    Json(StatsView::new(
        report.as_deref(),
        state.monitor.is_connected(),
        unit,
    ))
}
