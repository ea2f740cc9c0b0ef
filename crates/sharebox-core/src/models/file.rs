//! File record model and API response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One record per uploaded file. The record store is the data authority;
/// values handed to callers are point-in-time snapshots, not live views.
///
/// Invariants maintained by the record store and the share service:
/// - `share_token` is non-null if and only if `is_public` is true
/// - `download_count` never decreases
/// - `storage_key`/`storage_url` are set at creation and never change
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct FileRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub display_name: String,
    pub storage_key: String,
    pub storage_url: String,
    pub size_bytes: i64,
    pub media_type: String,
    pub share_token: Option<String>,
    pub is_public: bool,
    pub download_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a file record after the bytes are durably stored.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub owner_id: Uuid,
    pub display_name: String,
    pub storage_key: String,
    pub storage_url: String,
    pub size_bytes: i64,
    pub media_type: String,
}

/// Owner-facing view of a file record.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileRecordResponse {
    pub id: Uuid,
    pub display_name: String,
    pub media_type: String,
    pub size_bytes: i64,
    pub storage_url: String,
    pub is_public: bool,
    pub share_token: Option<String>,
    pub download_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FileRecord> for FileRecordResponse {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.id,
            display_name: record.display_name,
            media_type: record.media_type,
            size_bytes: record.size_bytes,
            storage_url: record.storage_url,
            is_public: record.is_public,
            share_token: record.share_token,
            download_count: record.download_count,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Response for share-link generation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShareLinkResponse {
    /// The share token; the only secret in the link
    pub share_token: String,
    /// Addressable form: `{base}/share/{token}`
    pub share_url: String,
}

/// Anonymous view of a shared record. Owner identity and the storage key are
/// deliberately absent; anyone holding the token may see the rest.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicFileResponse {
    pub display_name: String,
    pub media_type: String,
    pub size_bytes: i64,
    pub download_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&FileRecord> for PublicFileResponse {
    fn from(record: &FileRecord) -> Self {
        Self {
            display_name: record.display_name.clone(),
            media_type: record.media_type.clone(),
            size_bytes: record.size_bytes,
            download_count: record.download_count,
            created_at: record.created_at,
        }
    }
}
