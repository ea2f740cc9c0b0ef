//! File lifecycle orchestration: upload, fetch, list, download, delete.
//!
//! Composes the object store and the record store so handlers stay thin and
//! the flows are unit-testable without HTTP. Ordering rules:
//! - upload writes bytes first; the record only exists after confirmed
//!   storage success
//! - delete removes bytes first; a storage failure leaves the record intact
//!   so the owner can retry

use bytes::Bytes;
use futures::Stream;
use sharebox_core::constants::DEFAULT_MEDIA_TYPE;
use sharebox_core::models::{FileRecord, NewFileRecord};
use sharebox_core::validation::validate_upload;
use sharebox_core::AppError;
use sharebox_db::FileStore;
use sharebox_storage::{Storage, StorageError};
use std::pin::Pin;
use std::sync::Arc;
use uuid::Uuid;

/// Stream of file bytes handed to download handlers.
pub type FileByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Service for file lifecycle operations.
#[derive(Clone)]
pub struct FileLifecycleService {
    store: Arc<dyn FileStore>,
    storage: Arc<dyn Storage>,
    max_file_size: usize,
}

impl FileLifecycleService {
    pub fn new(store: Arc<dyn FileStore>, storage: Arc<dyn Storage>, max_file_size: usize) -> Self {
        Self {
            store,
            storage,
            max_file_size,
        }
    }

    /// Upload bytes and create the file record.
    ///
    /// Bytes go to the object store first; if that write fails no record is
    /// created. If the record insert fails afterwards the stored object is
    /// orphaned - logged with its key so reconciliation can find it, and the
    /// error is surfaced to the caller.
    #[tracing::instrument(skip(self, data), fields(owner_id = %owner_id, operation = "upload_file"))]
    pub async fn upload(
        &self,
        owner_id: Uuid,
        display_name: &str,
        media_type: Option<&str>,
        data: Vec<u8>,
    ) -> Result<FileRecord, AppError> {
        validate_upload(display_name, data.len(), self.max_file_size)?;

        let media_type = media_type
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_MEDIA_TYPE)
            .to_string();
        let size_bytes = data.len() as i64;

        let (storage_key, storage_url) = self
            .storage
            .upload(owner_id, display_name, &media_type, data)
            .await?;

        let record = self
            .store
            .create(NewFileRecord {
                owner_id,
                display_name: display_name.to_string(),
                storage_key: storage_key.clone(),
                storage_url,
                size_bytes,
                media_type,
            })
            .await
            .map_err(|e| {
                tracing::warn!(
                    error = %e,
                    storage_key = %storage_key,
                    "Record create failed after storage write; stored object is orphaned"
                );
                e
            })?;

        tracing::info!(
            file_id = %record.id,
            size_bytes = record.size_bytes,
            media_type = %record.media_type,
            "File uploaded"
        );

        Ok(record)
    }

    /// Fetch a record, enforcing ownership. Unknown ids yield `NotFound`;
    /// records owned by someone else yield `PermissionDenied`.
    pub async fn get(&self, requester_id: Uuid, file_id: Uuid) -> Result<FileRecord, AppError> {
        let record = self
            .store
            .get_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        if record.owner_id != requester_id {
            return Err(AppError::PermissionDenied(
                "You do not own this file".to_string(),
            ));
        }

        Ok(record)
    }

    /// All files owned by the caller, newest first.
    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<FileRecord>, AppError> {
        self.store.list_by_owner(owner_id).await
    }

    /// Stream a file's bytes to its owner and record the download.
    pub async fn download(
        &self,
        requester_id: Uuid,
        file_id: Uuid,
    ) -> Result<(FileRecord, FileByteStream), AppError> {
        let mut record = self.get(requester_id, file_id).await?;

        let stream = self.storage.download_stream(&record.storage_key).await?;
        record.download_count = self.store.increment_download_count(file_id).await?;

        Ok((record, stream))
    }

    /// Delete a file: object store entry first, then the record.
    ///
    /// A storage failure aborts the whole operation and surfaces to the
    /// caller; an orphaned object is preferred over a record that points at
    /// nothing.
    #[tracing::instrument(skip(self), fields(file_id = %file_id, operation = "delete_file"))]
    pub async fn delete(&self, requester_id: Uuid, file_id: Uuid) -> Result<(), AppError> {
        let record = self.get(requester_id, file_id).await?;

        self.storage
            .delete(&record.storage_key)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    storage_key = %record.storage_key,
                    "Storage delete failed; record retained"
                );
                AppError::from(e)
            })?;

        let removed = self.store.delete(file_id).await?;
        if !removed {
            // Another caller removed the record between the fetch and the delete.
            tracing::debug!(file_id = %file_id, "Record already removed");
        }

        tracing::info!(file_id = %file_id, "File deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharebox_db::MemoryFileStore;
    use sharebox_storage::LocalStorage;
    use tempfile::TempDir;

    async fn service() -> (FileLifecycleService, Arc<dyn Storage>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn Storage> = Arc::new(
            LocalStorage::new(dir.path(), "http://localhost:3000/files".to_string())
                .await
                .unwrap(),
        );
        let store: Arc<dyn FileStore> = Arc::new(MemoryFileStore::new());
        (
            FileLifecycleService::new(store, storage.clone(), 1024 * 1024),
            storage,
            dir,
        )
    }

    #[tokio::test]
    async fn test_upload_creates_record_with_defaults() {
        let (service, storage, _dir) = service().await;
        let owner = Uuid::new_v4();

        let record = service
            .upload(owner, "notes.txt", Some("text/plain"), b"hello".to_vec())
            .await
            .unwrap();

        assert_eq!(record.owner_id, owner);
        assert_eq!(record.display_name, "notes.txt");
        assert_eq!(record.size_bytes, 5);
        assert!(!record.is_public);
        assert!(record.share_token.is_none());
        assert_eq!(record.download_count, 0);

        // Stored bytes round-trip via the object store.
        let bytes = storage.download(&record.storage_key).await.unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[tokio::test]
    async fn test_upload_defaults_media_type() {
        let (service, _storage, _dir) = service().await;
        let record = service
            .upload(Uuid::new_v4(), "blob", None, b"x".to_vec())
            .await
            .unwrap();
        assert_eq!(record.media_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_file() {
        let (service, _storage, _dir) = service().await;
        let err = service
            .upload(Uuid::new_v4(), "empty.txt", None, Vec::new())
            .await;
        assert!(matches!(err, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file() {
        let store: Arc<dyn FileStore> = Arc::new(MemoryFileStore::new());
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn Storage> = Arc::new(
            LocalStorage::new(dir.path(), "http://localhost:3000/files".to_string())
                .await
                .unwrap(),
        );
        let small = FileLifecycleService::new(store, storage, 4);

        let err = small
            .upload(Uuid::new_v4(), "big.bin", None, b"12345".to_vec())
            .await;
        assert!(matches!(err, Err(AppError::PayloadTooLarge(_))));
    }

    #[tokio::test]
    async fn test_get_enforces_ownership() {
        let (service, _storage, _dir) = service().await;
        let owner = Uuid::new_v4();
        let record = service
            .upload(owner, "a.txt", None, b"x".to_vec())
            .await
            .unwrap();

        assert!(service.get(owner, record.id).await.is_ok());
        assert!(matches!(
            service.get(Uuid::new_v4(), record.id).await,
            Err(AppError::PermissionDenied(_))
        ));
        assert!(matches!(
            service.get(owner, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_object_and_record() {
        let (service, storage, _dir) = service().await;
        let owner = Uuid::new_v4();
        let record = service
            .upload(owner, "a.txt", None, b"x".to_vec())
            .await
            .unwrap();

        service.delete(owner, record.id).await.unwrap();

        assert!(!storage.exists(&record.storage_key).await.unwrap());
        assert!(matches!(
            service.get(owner, record.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_is_permission_denied() {
        let (service, storage, _dir) = service().await;
        let owner = Uuid::new_v4();
        let record = service
            .upload(owner, "a.txt", None, b"x".to_vec())
            .await
            .unwrap();

        let err = service.delete(Uuid::new_v4(), record.id).await;
        assert!(matches!(err, Err(AppError::PermissionDenied(_))));
        // Nothing was removed.
        assert!(storage.exists(&record.storage_key).await.unwrap());
        assert!(service.get(owner, record.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_owner_download_streams_and_counts() {
        use futures::StreamExt;

        let (service, _storage, _dir) = service().await;
        let owner = Uuid::new_v4();
        let record = service
            .upload(owner, "a.txt", None, b"stream me".to_vec())
            .await
            .unwrap();

        let (downloaded, mut stream) = service.download(owner, record.id).await.unwrap();
        assert_eq!(downloaded.download_count, 1);

        let mut bytes = Vec::new();
        while let Some(chunk) = stream.next().await {
            bytes.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(bytes, b"stream me");
    }

    #[tokio::test]
    async fn test_list_is_owner_scoped_newest_first() {
        let (service, _storage, _dir) = service().await;
        let owner = Uuid::new_v4();

        service
            .upload(owner, "first.txt", None, b"1".to_vec())
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        service
            .upload(owner, "second.txt", None, b"2".to_vec())
            .await
            .unwrap();
        service
            .upload(Uuid::new_v4(), "other.txt", None, b"3".to_vec())
            .await
            .unwrap();

        let listed = service.list(owner).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].display_name, "second.txt");
        assert_eq!(listed[1].display_name, "first.txt");
    }
}
