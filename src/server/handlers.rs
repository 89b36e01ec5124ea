//! HTTP handlers for the analysis API.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::AppState;
use crate::llm::LlmError;
use crate::models::AnalysisReport;

/// Upload extensions accepted by the file endpoint.
const ACCEPTED_EXTENSIONS: [&str; 2] = [".txt", ".csv"];

/// How much of the probe reply the health endpoint echoes back.
const PROBE_PREVIEW_CHARS: usize = 50;

/// Request body for direct text analysis.
#[derive(Debug, Deserialize)]
pub struct TextAnalysisRequest {
    pub comments: String,
}

/// Errors surfaced to API clients as `{"error": ...}` JSON.
#[derive(Debug)]
pub enum ApiError {
    /// Upload had no usable `file` field.
    MissingFile,
    /// Upload extension is not .txt or .csv.
    InvalidFileType,
    /// Upload bytes are not valid UTF-8 text.
    UnreadableInput,
    /// Uploaded file is empty after trimming.
    EmptyFile,
    /// Direct text submission is empty after trimming.
    EmptyText,
    /// Multipart stream could not be read.
    Upload(String),
    /// Model invocation failed.
    Model(LlmError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingFile => (
                StatusCode::BAD_REQUEST,
                "No file field found in upload".to_string(),
            ),
            ApiError::InvalidFileType => (
                StatusCode::BAD_REQUEST,
                "Please upload a .txt or .csv file".to_string(),
            ),
            ApiError::UnreadableInput => (
                StatusCode::BAD_REQUEST,
                "Could not read file. Please ensure it's a valid text file.".to_string(),
            ),
            ApiError::EmptyFile => (
                StatusCode::BAD_REQUEST,
                "File appears to be empty".to_string(),
            ),
            ApiError::EmptyText => (
                StatusCode::BAD_REQUEST,
                "Comments text cannot be empty".to_string(),
            ),
            ApiError::Upload(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Could not read upload: {}", msg),
            ),
            ApiError::Model(LlmError::Timeout(_)) => (
                StatusCode::REQUEST_TIMEOUT,
                "AI analysis timed out".to_string(),
            ),
            ApiError::Model(LlmError::RuntimeNotFound(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Ollama not found. Make sure it's installed and running.".to_string(),
            ),
            ApiError::Model(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("AI analysis failed: {}", e),
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Service banner.
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "commentlens API",
        "status": "running",
    }))
}

/// Health check: probes the model runtime with a trivial prompt.
///
/// Always replies 200; a broken runtime is reported in the body rather
/// than as a transport failure.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.analyzer.probe().await {
        Ok(reply) => {
            let preview = if reply.chars().count() > PROBE_PREVIEW_CHARS {
                let cut: String = reply.chars().take(PROBE_PREVIEW_CHARS).collect();
                format!("{}...", cut)
            } else {
                reply
            };
            Json(json!({
                "status": "healthy",
                "ollama_status": "connected",
                "test_response": preview,
            }))
        }
        Err(e) => {
            warn!("health probe failed: {}", e);
            Json(json!({
                "status": "unhealthy",
                "ollama_status": "disconnected",
                "error": e.to_string(),
            }))
        }
    }
}

/// Analyze comments submitted as JSON text.
pub async fn analyze_text(
    State(state): State<AppState>,
    Json(request): Json<TextAnalysisRequest>,
) -> Result<Json<AnalysisReport>, ApiError> {
    if request.comments.trim().is_empty() {
        return Err(ApiError::EmptyText);
    }

    let result = state
        .analyzer
        .analyze(&request.comments)
        .await
        .map_err(ApiError::Model)?;

    Ok(Json(AnalysisReport::new(result, &request.comments, None)))
}

/// Analyze comments submitted as an uploaded .txt or .csv file.
pub async fn analyze_comments_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Upload(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::Upload(e.to_string()))?;
            upload = Some((filename, bytes.to_vec()));
            break;
        }
    }

    let (filename, bytes) = upload.ok_or(ApiError::MissingFile)?;

    if !ACCEPTED_EXTENSIONS.iter().any(|ext| filename.ends_with(ext)) {
        return Err(ApiError::InvalidFileType);
    }

    let comments = std::str::from_utf8(&bytes).map_err(|_| ApiError::UnreadableInput)?;
    if comments.trim().is_empty() {
        return Err(ApiError::EmptyFile);
    }

    let result = state
        .analyzer
        .analyze(comments)
        .await
        .map_err(ApiError::Model)?;

    Ok(Json(AnalysisReport::new(result, comments, Some(filename))))
}
