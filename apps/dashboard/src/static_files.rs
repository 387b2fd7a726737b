//! Embedded static assets (stylesheet and scripts) served at `/static/*path`.

use axum::{
    body::Body,
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "static/"]
pub struct StaticAssets;

pub async fn serve_static(Path(path): Path<String>) -> Response {
    let Some(content) = StaticAssets::get(&path) else {
        tracing::debug!(path = %path, "Static asset not found");
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    (
        [
            (header::CONTENT_TYPE, mime.as_ref().to_string()),
            (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
        ],
        Body::from(content.data.into_owned()),
    )
        .into_response()
}
