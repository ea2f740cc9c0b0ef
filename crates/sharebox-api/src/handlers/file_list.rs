use crate::auth::models::UserContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, Json};
use sharebox_core::models::FileRecordResponse;
use std::sync::Arc;

/// List the caller's files, newest first. Never includes anyone else's
/// records, shared or not.
#[utoipa::path(
    get,
    path = "/api/v0/files",
    tag = "files",
    responses(
        (status = 200, description = "Files owned by the caller", body = [FileRecordResponse]),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, operation = "list_files"))]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    user: UserContext,
) -> Result<Json<Vec<FileRecordResponse>>, HttpAppError> {
    let records = state.files.list(user.user_id).await?;

    Ok(Json(
        records.into_iter().map(FileRecordResponse::from).collect(),
    ))
}
