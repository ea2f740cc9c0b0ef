use crate::auth::models::UserContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use sharebox_core::models::ShareLinkResponse;
use sharebox_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

/// Generate a share link for one of the caller's files.
///
/// Idempotent: repeating the call returns the existing token instead of
/// minting a second one, so links already handed out keep working.
#[utoipa::path(
    post,
    path = "/api/v0/files/{id}/share",
    tag = "share",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "Share link", body = ShareLinkResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, file_id = %id, operation = "create_share_link"))]
pub async fn create_share_link(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Path(id): Path<Uuid>,
) -> Result<Json<ShareLinkResponse>, HttpAppError> {
    let record = state.shares.generate_share_link(user.user_id, id).await?;

    let share_token = record.share_token.ok_or_else(|| {
        HttpAppError(AppError::Internal(
            "Share token missing after generation".to_string(),
        ))
    })?;
    let share_url = state.config.share_url(&share_token);

    Ok(Json(ShareLinkResponse {
        share_token,
        share_url,
    }))
}
