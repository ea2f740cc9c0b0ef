//! Public share route: resolves a token to file metadata (no auth).

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::share::ShareService;
use axum::{
    extract::{Path, State},
    Json,
};
use sharebox_core::models::PublicFileResponse;

/// Resolve a share token to the shared file's metadata. No auth required;
/// the token is the only secret. Any miss is a uniform 404.
#[utoipa::path(
    get,
    path = "/share/{token}",
    tag = "share",
    params(
        ("token" = String, Path, description = "Share token")
    ),
    responses(
        (status = 200, description = "Shared file metadata", body = PublicFileResponse),
        (status = 404, description = "No shared file for this token", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(shares, token), fields(operation = "get_shared_file"))]
pub async fn get_shared_file(
    State(shares): State<ShareService>,
    Path(token): Path<String>,
) -> Result<Json<PublicFileResponse>, HttpAppError> {
    let record = shares.resolve_public(&token).await?;
    Ok(Json(PublicFileResponse::from(&record)))
}
