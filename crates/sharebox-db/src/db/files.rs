//! File record store: contract and PostgreSQL implementation.
//!
//! The store is the single authority over persisted file records. Reads
//! return point-in-time snapshots; callers re-fetch to observe mutations made
//! by others. The two operations with hard atomicity requirements are
//! `increment_download_count` (a single UPDATE, never read-modify-write in
//! application code) and share-token uniqueness (enforced by the partial
//! unique index, surfaced as `Conflict`).

use async_trait::async_trait;
use chrono::Utc;
use sharebox_core::models::{FileRecord, NewFileRecord};
use sharebox_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Contract for the file record store.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persist a new record. `share_token` starts null, `is_public` false,
    /// `download_count` zero.
    async fn create(&self, record: NewFileRecord) -> Result<FileRecord, AppError>;

    /// Fetch a record by id.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<FileRecord>, AppError>;

    /// Fetch a record by share token (exact match).
    async fn get_by_share_token(&self, token: &str) -> Result<Option<FileRecord>, AppError>;

    /// All records owned by `owner_id`, newest first by `created_at`.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<FileRecord>, AppError>;

    /// Set the share token and flip the record public, but only if no token
    /// is set yet. If the record already carries a token the existing record
    /// is returned unchanged, so concurrent generate calls converge on the
    /// first writer's token.
    ///
    /// Errors: `NotFound` if the record does not exist; `Conflict` if the
    /// token is already used by a different record (caller retries with a
    /// fresh token).
    async fn set_share_token(&self, id: Uuid, token: &str) -> Result<FileRecord, AppError>;

    /// Atomically increment the download counter and return the new value.
    /// Errors with `NotFound` if the record does not exist.
    async fn increment_download_count(&self, id: Uuid) -> Result<i64, AppError>;

    /// Hard-delete a record. Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

/// PostgreSQL-backed file record store.
#[derive(Clone)]
pub struct PgFileStore {
    pool: PgPool,
}

impl PgFileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for PgFileStore {
    #[tracing::instrument(skip(self, record), fields(db.table = "files", db.operation = "insert", owner_id = %record.owner_id))]
    async fn create(&self, record: NewFileRecord) -> Result<FileRecord, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let row: FileRecord = sqlx::query_as::<Postgres, FileRecord>(
            r#"
            INSERT INTO files (
                id, owner_id, display_name, storage_key, storage_url,
                size_bytes, media_type, share_token, is_public, download_count,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, NULL, FALSE, 0, $8, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(record.owner_id)
        .bind(&record.display_name)
        .bind(&record.storage_key)
        .bind(&record.storage_url)
        .bind(record.size_bytes)
        .bind(&record.media_type)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select", db.record_id = %id))]
    async fn get_by_id(&self, id: Uuid) -> Result<Option<FileRecord>, AppError> {
        let row: Option<FileRecord> =
            sqlx::query_as::<Postgres, FileRecord>("SELECT * FROM files WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row)
    }

    // Token deliberately absent from the span.
    #[tracing::instrument(skip(self, token), fields(db.table = "files", db.operation = "select"))]
    async fn get_by_share_token(&self, token: &str) -> Result<Option<FileRecord>, AppError> {
        let row: Option<FileRecord> =
            sqlx::query_as::<Postgres, FileRecord>("SELECT * FROM files WHERE share_token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select", owner_id = %owner_id))]
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<FileRecord>, AppError> {
        let rows: Vec<FileRecord> = sqlx::query_as::<Postgres, FileRecord>(
            "SELECT * FROM files WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip(self, token), fields(db.table = "files", db.operation = "update", db.record_id = %id))]
    async fn set_share_token(&self, id: Uuid, token: &str) -> Result<FileRecord, AppError> {
        let updated: Option<FileRecord> = sqlx::query_as::<Postgres, FileRecord>(
            r#"
            UPDATE files
            SET share_token = $2, is_public = TRUE, updated_at = NOW()
            WHERE id = $1 AND share_token IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                AppError::Conflict("Share token already in use".to_string())
            } else {
                AppError::from(e)
            }
        })?;

        if let Some(record) = updated {
            return Ok(record);
        }

        // No row matched: either the record is gone, or a token was already
        // set (by an earlier call or a concurrent one) - return it as-is.
        self.get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "update", db.record_id = %id))]
    async fn increment_download_count(&self, id: Uuid) -> Result<i64, AppError> {
        let count: Option<i64> = sqlx::query_scalar::<Postgres, i64>(
            r#"
            UPDATE files
            SET download_count = download_count + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING download_count
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        count.ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}
