//! Mapping of pipeline errors onto HTTP responses.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pdfrag::RagError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors returned by the HTTP handlers.
///
/// Every variant renders as `{"detail": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A pipeline failure. The status follows its kind.
    #[error(transparent)]
    Rag(#[from] RagError),

    /// The uploaded file is not a PDF.
    #[error("The file must be a PDF, got '{0}'")]
    UnsupportedFile(String),

    /// The multipart body could not be read.
    #[error("{}", .0.body_text())]
    Multipart(#[from] MultipartError),

    /// The request is missing a required part.
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnsupportedFile(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Multipart(e) => e.status(),
            Self::Rag(RagError::GenerationTimeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            Self::Rag(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Rag(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
