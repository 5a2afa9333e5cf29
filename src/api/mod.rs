//! API layer - HTTP handlers and routing
//!
//! The server exposes exactly two API routes:
//! - agenda dataset endpoint
//! - health check
//! Every other path falls back to the embedded application shell.

pub mod agenda;
pub mod static_files;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared by the handlers
#[derive(Clone)]
pub struct AppState {
    /// Location of the extracted agenda dataset on disk
    pub data_path: Arc<PathBuf>,
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self::new("DATA_UNAVAILABLE", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            cors_origin
                .parse::<HeaderValue>()
                .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:5173")),
        )
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/agenda", get(agenda::get_agenda))
        .route("/api/health", get(agenda::health))
        // Application shell (for production)
        .fallback(static_files::serve_static)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use std::io::Write;

    fn test_state(contents: &str) -> (AppState, tempfile::NamedTempFile) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        let state = AppState {
            data_path: Arc::new(file.path().to_path_buf()),
        };
        (state, file)
    }

    fn server(state: AppState) -> TestServer {
        TestServer::new(build_router(state, "http://localhost:5173")).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_healthy() {
        let (state, _file) = test_state("[]");
        let server = server(state);

        let response = server.get("/api/health").await;
        response.assert_status_ok();
        response.assert_json(&serde_json::json!({"status": "healthy"}));
    }

    #[tokio::test]
    async fn test_agenda_serves_dataset_verbatim() {
        let payload = r#"[{"EventItemId":"1","EventItemTitle":"Road contract"}]"#;
        let (state, _file) = test_state(payload);
        let server = server(state);

        let response = server.get("/api/agenda").await;
        response.assert_status_ok();
        assert_eq!(
            response.header(header::CONTENT_TYPE),
            "application/json"
        );
        assert_eq!(response.text(), payload);
    }

    #[tokio::test]
    async fn test_agenda_missing_file_is_data_unavailable() {
        let state = AppState {
            data_path: Arc::new(PathBuf::from("nonexistent/extracted_data.json")),
        };
        let server = server(state);

        let response = server.get("/api/agenda").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: ApiError = response.json();
        assert_eq!(body.error.code, "DATA_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_unknown_path_falls_back_to_shell() {
        let (state, _file) = test_state("[]");
        let server = server(state);

        let response = server.get("/some/client/route").await;
        response.assert_status_ok();
        assert!(response
            .header(header::CONTENT_TYPE)
            .to_str()
            .unwrap()
            .starts_with("text/html"));
    }
}
