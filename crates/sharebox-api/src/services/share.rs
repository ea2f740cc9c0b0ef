//! Share token service: minting, resolution, and public download accounting.
//!
//! Tokens are the only secret in a share link; they never appear in spans or
//! log lines, and every resolution miss collapses into the same NotFound so a
//! probe learns nothing beyond hit/no-hit.

use rand::{distr::Alphanumeric, Rng};
use sharebox_core::constants::{SHARE_TOKEN_LENGTH, SHARE_TOKEN_MAX_ATTEMPTS};
use sharebox_core::models::FileRecord;
use sharebox_core::AppError;
use sharebox_db::FileStore;
use std::sync::Arc;
use uuid::Uuid;

/// Generate a share token: alphanumeric, drawn from a CSPRNG.
pub fn generate_share_token() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(SHARE_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Service for share-link operations.
#[derive(Clone)]
pub struct ShareService {
    store: Arc<dyn FileStore>,
}

impl ShareService {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    fn not_found() -> AppError {
        AppError::NotFound("File not found".to_string())
    }

    /// Mint a share token for the caller's file, flipping it public.
    ///
    /// Idempotent: if the file already carries a token it is returned
    /// unchanged, so previously distributed links keep working. Collisions
    /// with existing tokens are retried with fresh randomness a bounded
    /// number of times before surfacing an error.
    #[tracing::instrument(skip(self), fields(file_id = %file_id, operation = "generate_share_link"))]
    pub async fn generate_share_link(
        &self,
        owner_id: Uuid,
        file_id: Uuid,
    ) -> Result<FileRecord, AppError> {
        let record = self
            .store
            .get_by_id(file_id)
            .await?
            .ok_or_else(Self::not_found)?;

        if record.owner_id != owner_id {
            return Err(AppError::PermissionDenied(
                "You do not own this file".to_string(),
            ));
        }

        if record.share_token.is_some() {
            return Ok(record);
        }

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let token = generate_share_token();

            match self.store.set_share_token(file_id, &token).await {
                Ok(record) => {
                    tracing::info!(file_id = %file_id, "Share link generated");
                    return Ok(record);
                }
                Err(AppError::Conflict(_)) if attempt < SHARE_TOKEN_MAX_ATTEMPTS => {
                    tracing::warn!(
                        file_id = %file_id,
                        attempt = attempt,
                        "Share token collision, regenerating"
                    );
                }
                Err(AppError::Conflict(_)) => {
                    return Err(AppError::Storage(
                        "Could not allocate a unique share token".to_string(),
                    ));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Resolve a token to its public record.
    ///
    /// Uniform NotFound on any miss: unknown token, or - defensively, since
    /// the store invariant makes it unreachable - a token on a non-public
    /// record.
    #[tracing::instrument(skip(self, token), fields(operation = "resolve_public"))]
    pub async fn resolve_public(&self, token: &str) -> Result<FileRecord, AppError> {
        if token.is_empty() {
            return Err(Self::not_found());
        }

        match self.store.get_by_share_token(token).await? {
            Some(record) if record.is_public && record.share_token.as_deref() == Some(token) => {
                Ok(record)
            }
            _ => Err(Self::not_found()),
        }
    }

    /// Record an anonymous download: resolve the token, then atomically bump
    /// the counter. Returns the record with the post-increment count.
    #[tracing::instrument(skip(self, token), fields(operation = "record_public_download"))]
    pub async fn record_public_download(&self, token: &str) -> Result<FileRecord, AppError> {
        let mut record = self.resolve_public(token).await?;

        record.download_count = match self.store.increment_download_count(record.id).await {
            Ok(count) => count,
            // Deleted between resolve and increment: same uniform answer.
            Err(AppError::NotFound(_)) => return Err(Self::not_found()),
            Err(e) => return Err(e),
        };

        Ok(record)
    }
}
