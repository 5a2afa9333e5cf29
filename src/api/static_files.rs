//! Embedded application shell serving

use axum::{
    body::Body,
    http::{header, StatusCode, Uri},
    response::Response,
};
use rust_embed::RustEmbed;

/// Embedded shell files (table UI)
#[derive(RustEmbed)]
#[folder = "web/dist/"]
#[include = "*"]
struct ShellAssets;

/// Serve shell assets; any path without an exact asset match gets
/// `index.html` so client-side routing keeps working.
pub async fn serve_static(uri: Uri) -> Response {
    let path = uri.path();
    // URL decode the path to handle encoded characters
    let decoded_path = urlencoding::decode(path).unwrap_or_else(|_| path.into());
    let asset_path = decoded_path.trim_start_matches('/');
    let asset_path = if asset_path.is_empty() {
        "index.html"
    } else {
        asset_path
    };

    // Try exact file match (static assets like JS, CSS, images)
    if let Some(content) = ShellAssets::get(asset_path) {
        return build_response(asset_path, &content.data);
    }

    // SPA fallback: serve index.html for all other routes
    if let Some(content) = ShellAssets::get("index.html") {
        return build_response("index.html", &content.data);
    }

    not_found()
}

/// Build HTTP response with proper headers
fn build_response(path: &str, data: &[u8]) -> Response {
    let content_type = get_content_type(path);
    let cache_control = if is_immutable(path) {
        "public, max-age=31536000, immutable"
    } else if content_type.starts_with("text/html") {
        "no-cache"
    } else {
        "public, max-age=3600"
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, cache_control)
        .body(Body::from(data.to_vec()))
        .unwrap_or_else(|_| {
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::empty())
                .expect("empty response")
        })
}

/// 404 response
fn not_found() -> Response {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Body::from("<html><body><h1>404 Not Found</h1></body></html>"))
        .expect("static 404 response")
}

/// Get content type from file extension
fn get_content_type(path: &str) -> &'static str {
    match path.rsplit('.').next().unwrap_or("") {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Check if file is immutable (hashed filename)
fn is_immutable(path: &str) -> bool {
    path.contains("/assets/") && (path.ends_with(".js") || path.ends_with(".css"))
}
