//! Public download route: counts the download, then redirects to the bytes.

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::share::ShareService;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use sharebox_core::AppError;

/// Download a shared file anonymously. The download is recorded with an
/// atomic counter increment before the redirect to the stored URL, so
/// concurrent downloads of a popular link are all reflected in the count.
#[utoipa::path(
    get,
    path = "/share/{token}/download",
    tag = "share",
    params(
        ("token" = String, Path, description = "Share token")
    ),
    responses(
        (status = 302, description = "Redirect to the file bytes"),
        (status = 404, description = "No shared file for this token", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(shares, token), fields(operation = "download_shared_file"))]
pub async fn download_shared_file(
    State(shares): State<ShareService>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = shares.record_public_download(&token).await?;

    tracing::debug!(
        file_id = %record.id,
        download_count = record.download_count,
        "Public download recorded"
    );

    let response = Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, record.storage_url.as_str())
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::empty())
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError(AppError::Internal(e.to_string()))
        })?;

    Ok(response)
}
