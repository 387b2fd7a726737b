//! Preference toggles posted from the page chrome.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use rclone_stats::BaseUnit;
use serde::Deserialize;

use crate::error::Result;
use crate::services::Preferences;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ToggleForm {
    /// Page to return to after the toggle.
    pub return_to: Option<String>,
}

/// Only same-site absolute paths are followed.
fn return_path(return_to: Option<&str>) -> &str {
    match return_to {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/",
    }
}

async fn toggle<F>(state: &AppState, form: &ToggleForm, change: F) -> Result<Response>
where
    F: FnOnce(&mut Preferences),
{
    let preferences = state.preferences.update(change).await?;
    tracing::debug!(?preferences, "Preference toggled");
    Ok(Redirect::to(return_path(form.return_to.as_deref())).into_response())
}

/// POST /preferences/theme
pub async fn toggle_theme(
    State(state): State<AppState>,
    Form(form): Form<ToggleForm>,
) -> Result<Response> {
    toggle(&state, &form, |p| p.dark_mode = !p.dark_mode).await
}

/// POST /preferences/drawer
pub async fn toggle_drawer(
    State(state): State<AppState>,
    Form(form): Form<ToggleForm>,
) -> Result<Response> {
    toggle(&state, &form, |p| p.drawer_open = !p.drawer_open).await
}

/// POST /preferences/unit
pub async fn toggle_unit(
    State(state): State<AppState>,
    Form(form): Form<ToggleForm>,
) -> Result<Response> {
    toggle(&state, &form, |p| {
        p.unit = match p.unit {
            BaseUnit::Bytes => BaseUnit::Bits,
            BaseUnit::Bits => BaseUnit::Bytes,
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_path() {
        assert_eq!(return_path(Some("/history")), "/history");
        assert_eq!(return_path(Some("//evil.example")), "/");
        assert_eq!(return_path(Some("https://evil.example")), "/");
        assert_eq!(return_path(None), "/");
    }
}
