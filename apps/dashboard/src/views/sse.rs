//! Server-Sent Events for live dashboard updates
//!
//! Each snapshot published by the monitor is rendered into the transfer list
//! and status partials and sent as `transfers` and `status` events, which
//! HTMX swaps into the page.

use std::convert::Infallible;
use std::pin::Pin;
use std::time::Duration;

use askama::Template;
use async_stream::stream;
use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
};
use futures::Stream;
use rclone_stats::StatsReport;
use tokio::sync::broadcast;

use crate::display::{StatsView, StatusView, TransferView};
use crate::services::MonitorEvent;
use crate::AppState;

// =============================================================================
// Templates
// =============================================================================

#[derive(Template)]
#[template(path = "partials/transfers.html")]
pub struct TransfersTemplate {
    pub transfers: Vec<TransferView>,
    pub checking: Vec<String>,
}

#[derive(Template)]
#[template(path = "partials/status.html")]
pub struct StatusTemplate {
    pub status: StatusView,
}

type EventStream = Pin<Box<dyn Stream<Item = Result<Event, Infallible>> + Send>>;

fn render_status(status: StatusView) -> Option<Event> {
    match (StatusTemplate { status }).render() {
        Ok(html) => Some(Event::default().event("status").data(html)),
        Err(e) => {
            tracing::error!("Failed to render status partial: {}", e);
            None
        }
    }
}

fn render_transfers(transfers: Vec<TransferView>, checking: Vec<String>) -> Option<Event> {
    match (TransfersTemplate {
        transfers,
        checking,
    })
    .render()
    {
        Ok(html) => Some(Event::default().event("transfers").data(html)),
        Err(e) => {
            tracing::error!("Failed to render transfers partial: {}", e);
            None
        }
    }
}

/// Both partials for one snapshot.
async fn render_snapshot(state: &AppState, report: Option<&StatsReport>) -> Vec<Event> {
    let unit = state.preferences.get().await.unit;
    let view = StatsView::new(report, state.monitor.is_connected(), unit);

    render_transfers(view.transfers, view.checking)
        .into_iter()
        .chain(render_status(view.status))
        .collect()
}

/// SSE stream of rendered stats partials
pub async fn stats_stream(State(state): State<AppState>) -> Response {
    let stream: EventStream = Box::pin(stream! {
        let mut event_rx = state.monitor.subscribe();

        let current = state.monitor.snapshot().await;
        for event in render_snapshot(&state, current.as_deref()).await {
            yield Ok(event);
        }

        loop {
            match event_rx.recv().await {
                Ok(MonitorEvent::Report(report)) => {
                    for event in render_snapshot(&state, Some(report.as_ref())).await {
                        yield Ok(event);
                    }
                }
                Ok(MonitorEvent::Connection { .. }) => {
                    let unit = state.preferences.get().await.unit;
                    let current = state.monitor.snapshot().await;
                    let status = StatusView::new(
                        current.as_deref(),
                        state.monitor.is_connected(),
                        unit,
                    );
                    if let Some(event) = render_status(status) {
                        yield Ok(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    tracing::debug!("SSE client lagged, skipped {} updates", count);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(15))
                .text("keep-alive"),
        )
        .into_response()
}
