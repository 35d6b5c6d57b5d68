use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recon_import::UploadError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Malformed multipart request: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Missing multipart field: {0}")]
    MissingPart(&'static str),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Upload(_) | ApiError::MissingPart(_) => StatusCode::BAD_REQUEST,
            // 413 when the body limit was hit, 400 for malformed parts.
            ApiError::Multipart(err) => err.status(),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Client errors echo their message; server faults stay generic.
        let message = match &self {
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "request failed");
                "Internal server error".to_string()
            }
            other => {
                tracing::warn!(status = status.as_u16(), "{other}");
                other.to_string()
            }
        };

        let body = ErrorBody {
            status: status.as_u16(),
            error: status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
