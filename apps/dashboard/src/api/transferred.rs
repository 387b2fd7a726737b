use axum::{extract::State, Json};
use rclone_stats::{decode_transferred, CompletedTransferReport};

use crate::error::{AppError, Result};
use crate::AppState;

/// GET /api/transferred
///
/// Completed transfers from rclone's `core/transferred`, newest first.
pub async fn list_transferred(State(state): State<AppState>) -> Result<Json<CompletedTransferReport>> {
    let source = state
        .rclone()
        .ok_or_else(|| AppError::NotFound("No rclone source configured".to_string()))?;

    let body = source.fetch_transferred().await?;
    let mut report = decode_transferred(&body).map_err(|e| {
        AppError::Upstream(format!("Invalid core/transferred response: {}", e))
    })?;

    report
        .transferred
        .sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

    tracing::debug!(count = report.transferred.len(), "Fetched completed transfers");
    Ok(Json(report))
}
