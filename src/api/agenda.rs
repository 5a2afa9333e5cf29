//! Agenda dataset and health endpoints

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::fs;

use crate::api::{ApiError, AppState};

/// Response for the health check
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /api/agenda - Serve the extracted agenda dataset
///
/// The file is served verbatim: schema validation is the consuming
/// fetcher's job, so drift surfaces there as a parse failure instead of
/// being coerced here.
pub async fn get_agenda(State(state): State<AppState>) -> Response {
    match fs::read(state.data_path.as_ref()).await {
        Ok(contents) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(contents))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        Err(err) => {
            tracing::error!(
                path = %state.data_path.display(),
                "failed to read agenda dataset: {err}"
            );
            ApiError::data_unavailable(format!(
                "agenda dataset could not be read: {err}"
            ))
            .into_response()
        }
    }
}

/// GET /api/health - Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}
