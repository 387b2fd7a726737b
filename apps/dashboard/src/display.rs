//! Display models shared by the HTML views and the formatted JSON API.
//!
//! Every quantity of a typed report passes through the `rclone_stats`
//! formatters here, so templates only ever see strings.

use rclone_stats::{
    format_duration, format_memory, BaseUnit, CompletedTransfer, Quantity, Seconds, StatsReport,
    TransferReport,
};
use serde::Serialize;

const NOT_AVAILABLE: &str = "N/A";

fn count(value: Option<u64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Duration tokens, with `0s` for zero and `N/A` for a missing magnitude.
fn duration(value: Quantity<Seconds>) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let formatted = format_duration(value);
    if formatted.is_empty() {
        "0s".to_string()
    } else {
        formatted
    }
}

// =============================================================================
// Transfers
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct TransferView {
    pub name: String,
    /// Progress bar fill, clamped to 0..=100.
    pub progress: f64,
    /// Rounded percentage, e.g. `42%`.
    pub progress_label: String,
    pub size: String,
    pub transferred: String,
    pub average_speed: String,
    pub current_speed: String,
    pub eta: String,
}

impl TransferView {
    pub fn new(transfer: &TransferReport, unit: BaseUnit) -> Self {
        let progress = if transfer.percentage.is_finite() {
            transfer.percentage.clamp(0.0, 100.0)
        } else {
            0.0
        };

        Self {
            name: transfer.name.clone(),
            progress,
            progress_label: format!("{}%", transfer.percentage.round()),
            size: format_memory(transfer.size, unit),
            transferred: format_memory(transfer.bytes, unit),
            average_speed: format_memory(transfer.speed, unit),
            current_speed: format_memory(transfer.speed_avg, unit),
            eta: transfer
                .eta
                .map(duration)
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

// =============================================================================
// Status
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub connected: bool,
    pub has_report: bool,
    pub average_speed: String,
    pub transferred: String,
    pub errors: String,
    pub checks: String,
    pub transfers: String,
    pub deletes: String,
    pub renames: String,
    pub elapsed_time: String,
    pub transfer_time: String,
    pub last_error: String,
    pub fatal_error: bool,
    pub retry_error: bool,
}

impl StatusView {
    pub fn new(report: Option<&StatsReport>, connected: bool, unit: BaseUnit) -> Self {
        match report {
            Some(report) => Self {
                connected,
                has_report: true,
                average_speed: format_memory(report.speed, unit),
                transferred: format_memory(report.bytes, unit),
                errors: count(report.errors),
                checks: count(report.checks),
                transfers: count(report.transfers),
                deletes: count(report.deletes),
                renames: count(report.renames),
                elapsed_time: duration(report.elapsed_time),
                transfer_time: duration(report.transfer_time),
                last_error: report.last_error.clone(),
                fatal_error: report.fatal_error,
                retry_error: report.retry_error,
            },
            None => Self {
                connected,
                has_report: false,
                average_speed: NOT_AVAILABLE.to_string(),
                transferred: NOT_AVAILABLE.to_string(),
                errors: NOT_AVAILABLE.to_string(),
                checks: NOT_AVAILABLE.to_string(),
                transfers: NOT_AVAILABLE.to_string(),
                deletes: NOT_AVAILABLE.to_string(),
                renames: NOT_AVAILABLE.to_string(),
                elapsed_time: NOT_AVAILABLE.to_string(),
                transfer_time: NOT_AVAILABLE.to_string(),
                last_error: String::new(),
                fatal_error: false,
                retry_error: false,
            },
        }
    }
}

/// Everything the dashboard shows for one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct StatsView {
    pub status: StatusView,
    pub transfers: Vec<TransferView>,
    pub checking: Vec<String>,
}

impl StatsView {
    pub fn new(report: Option<&StatsReport>, connected: bool, unit: BaseUnit) -> Self {
        Self {
            status: StatusView::new(report, connected, unit),
            transfers: report
                .map(|r| {
                    r.transferring
                        .iter()
                        .map(|t| TransferView::new(t, unit))
                        .collect()
                })
                .unwrap_or_default(),
            checking: report.map(|r| r.checking.clone()).unwrap_or_default(),
        }
    }
}

// =============================================================================
// History
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CompletedView {
    pub name: String,
    pub size: String,
    pub transferred: String,
    pub completed_at: String,
    pub duration: String,
    pub checked: bool,
    pub error: String,
}

impl CompletedView {
    pub fn new(transfer: &CompletedTransfer, unit: BaseUnit) -> Self {
        Self {
            name: transfer.name.clone(),
            size: format_memory(transfer.size, unit),
            transferred: format_memory(transfer.bytes, unit),
            completed_at: transfer
                .completed_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            duration: duration(transfer.duration()),
            checked: transfer.checked,
            error: transfer.error.clone(),
        }
    }
}

/// Completed transfers, most recently finished first.
pub fn history(transfers: &[CompletedTransfer], unit: BaseUnit) -> Vec<CompletedView> {
    let mut sorted: Vec<&CompletedTransfer> = transfers.iter().collect();
    sorted.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    sorted
        .into_iter()
        .map(|t| CompletedView::new(t, unit))
        .collect()
}
