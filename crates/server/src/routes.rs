use axum::{
    extract::{Multipart, State},
    Json,
};
use recon_core::UploadReport;
use recon_import::{reconcile_uploads, Upload};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::AppState;

pub const FIRST_FILE_FIELD: &str = "file1";
pub const SECOND_FILE_FIELD: &str = "file2";

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Reconciles the `file1` and `file2` parts of a multipart upload.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadReport>, ApiError> {
    let mut first = None;
    let mut second = None;

    while let Some(field) = multipart.next_field().await? {
        let slot = match field.name() {
            Some(FIRST_FILE_FIELD) => &mut first,
            Some(SECOND_FILE_FIELD) => &mut second,
            other => {
                tracing::debug!(field = ?other, "ignoring multipart field");
                continue;
            }
        };
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content = field.bytes().await?;
        *slot = Some(Upload::new(file_name, content.to_vec()));
    }

    let first = first.ok_or(ApiError::MissingPart(FIRST_FILE_FIELD))?;
    let second = second.ok_or(ApiError::MissingPart(SECOND_FILE_FIELD))?;

    tracing::info!(
        first = %first.file_name,
        first_bytes = first.content.len(),
        second = %second.file_name,
        second_bytes = second.content.len(),
        "received upload"
    );

    let options = state.options;
    let report = tokio::task::spawn_blocking(move || reconcile_uploads(&first, &second, &options))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??;

    Ok(Json(report))
}
