use crate::auth::models::UserContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use sharebox_core::models::FileRecordResponse;
use std::sync::Arc;
use uuid::Uuid;

/// Fetch one of the caller's file records.
#[utoipa::path(
    get,
    path = "/api/v0/files/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File record", body = FileRecordResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, file_id = %id, operation = "get_file"))]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Path(id): Path<Uuid>,
) -> Result<Json<FileRecordResponse>, HttpAppError> {
    let record = state.files.get(user.user_id, id).await?;
    Ok(Json(FileRecordResponse::from(record)))
}
