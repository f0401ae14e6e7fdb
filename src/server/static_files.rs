//! Serves the bundled stylesheet, htmx, and images from the static dir.

use std::path::{Component, Path as FsPath, PathBuf};

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::Response;
use bytes::Bytes;

use crate::server::{ApiError, AppState};

/// Resolves a URL path to a path strictly inside the static dir.
///
/// Anything that is not a plain chain of normal components (`..`, absolute
/// paths, drive prefixes) is rejected outright.
fn sanitize(raw: &str) -> Option<PathBuf> {
    let relative = FsPath::new(raw);
    let mut clean = PathBuf::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            _ => return None,
        }
    }
    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(clean)
    }
}

fn content_type_for(path: &FsPath) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    match ext {
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "html" => "text/html; charset=utf-8",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}

pub async fn serve(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    let Some(relative) = sanitize(&path) else {
        return Err(ApiError::NotFound);
    };
    let full = state.settings.static_dir.join(&relative);
    let data = match tokio::fs::read(&full).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(ApiError::NotFound),
        Err(e) => return Err(ApiError::Internal(format!("read {}: {e}", full.display()))),
    };
    Response::builder()
        .header(header::CONTENT_TYPE, content_type_for(&relative))
        .header(header::CACHE_CONTROL, "public, max-age=300")
        .body(Body::from(Bytes::from(data)))
        .map_err(|e| ApiError::Internal(e.to_string()))
}
