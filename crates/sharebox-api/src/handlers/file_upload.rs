use crate::auth::models::UserContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sharebox_core::models::FileRecordResponse;
use sharebox_core::AppError;
use std::sync::Arc;

/// Upload a file.
///
/// Accepts a multipart form with a single `file` field. Bytes are written to
/// the object store before the record is created, so a storage failure never
/// leaves a visible record.
#[utoipa::path(
    post,
    path = "/api/v0/files",
    tag = "files",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File uploaded", body = FileRecordResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = %user.user_id, operation = "upload_file"))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut upload: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid multipart payload: {}",
            e
        )))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let display_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| {
                HttpAppError(AppError::InvalidInput(format!(
                    "Failed to read upload: {}",
                    e
                )))
            })?
            .to_vec();

        upload = Some((display_name, content_type, data));
        break;
    }

    let (display_name, content_type, data) = upload.ok_or_else(|| {
        HttpAppError(AppError::InvalidInput(
            "Missing 'file' field in multipart payload".to_string(),
        ))
    })?;

    let record = state
        .files
        .upload(user.user_id, &display_name, content_type.as_deref(), data)
        .await?;

    Ok((StatusCode::CREATED, Json(FileRecordResponse::from(record))))
}
