//! In-memory file record store.
//!
//! Backs tests and local development the way the local filesystem backend
//! does for object storage. Semantics match `PgFileStore`: mutations are
//! atomic (a single write-lock critical section stands in for the database's
//! row-level atomicity) and share-token uniqueness is enforced across all
//! records.

use async_trait::async_trait;
use chrono::Utc;
use sharebox_core::models::{FileRecord, NewFileRecord};
use sharebox_core::AppError;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::files::FileStore;

/// In-process implementation of [`FileStore`].
#[derive(Default)]
pub struct MemoryFileStore {
    records: RwLock<HashMap<Uuid, FileRecord>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn create(&self, record: NewFileRecord) -> Result<FileRecord, AppError> {
        let now = Utc::now();
        let file = FileRecord {
            id: Uuid::new_v4(),
            owner_id: record.owner_id,
            display_name: record.display_name,
            storage_key: record.storage_key,
            storage_url: record.storage_url,
            size_bytes: record.size_bytes,
            media_type: record.media_type,
            share_token: None,
            is_public: false,
            download_count: 0,
            created_at: now,
            updated_at: now,
        };

        let mut records = self.records.write().await;
        records.insert(file.id, file.clone());
        Ok(file)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<FileRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn get_by_share_token(&self, token: &str) -> Result<Option<FileRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.share_token.as_deref() == Some(token))
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<FileRecord>, AppError> {
        let records = self.records.read().await;
        let mut owned: Vec<FileRecord> = records
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn set_share_token(&self, id: Uuid, token: &str) -> Result<FileRecord, AppError> {
        let mut records = self.records.write().await;

        let collides = records
            .values()
            .any(|r| r.id != id && r.share_token.as_deref() == Some(token));
        if collides {
            return Err(AppError::Conflict("Share token already in use".to_string()));
        }

        let record = records
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        if record.share_token.is_none() {
            record.share_token = Some(token.to_string());
            record.is_public = true;
            record.updated_at = Utc::now();
        }

        Ok(record.clone())
    }

    async fn increment_download_count(&self, id: Uuid) -> Result<i64, AppError> {
        let mut records = self.records.write().await;

        let record = records
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        record.download_count += 1;
        record.updated_at = Utc::now();
        Ok(record.download_count)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        Ok(records.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_record(owner_id: Uuid, name: &str) -> NewFileRecord {
        NewFileRecord {
            owner_id,
            display_name: name.to_string(),
            storage_key: format!("files/{}/1700000000000-{}", owner_id, name),
            storage_url: format!("http://localhost:3000/files/{}/{}", owner_id, name),
            size_bytes: 42,
            media_type: "text/plain".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let store = MemoryFileStore::new();
        let record = store
            .create(new_record(Uuid::new_v4(), "a.txt"))
            .await
            .unwrap();

        assert!(record.share_token.is_none());
        assert!(!record.is_public);
        assert_eq!(record.download_count, 0);
        assert_eq!(record.created_at, record.updated_at);
    }

    #[tokio::test]
    async fn test_list_by_owner_newest_first_and_scoped() {
        let store = MemoryFileStore::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        let first = store.create(new_record(owner, "first.txt")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = store.create(new_record(owner, "second.txt")).await.unwrap();
        store.create(new_record(other, "theirs.txt")).await.unwrap();

        let listed = store.list_by_owner(owner).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn test_set_share_token_once_then_sticky() {
        let store = MemoryFileStore::new();
        let record = store
            .create(new_record(Uuid::new_v4(), "a.txt"))
            .await
            .unwrap();

        let shared = store.set_share_token(record.id, "token-one").await.unwrap();
        assert_eq!(shared.share_token.as_deref(), Some("token-one"));
        assert!(shared.is_public);
        assert!(shared.updated_at > record.updated_at);

        // A second set with a different token does not replace the first.
        let again = store.set_share_token(record.id, "token-two").await.unwrap();
        assert_eq!(again.share_token.as_deref(), Some("token-one"));
    }

    #[tokio::test]
    async fn test_set_share_token_conflict_across_records() {
        let store = MemoryFileStore::new();
        let owner = Uuid::new_v4();
        let a = store.create(new_record(owner, "a.txt")).await.unwrap();
        let b = store.create(new_record(owner, "b.txt")).await.unwrap();

        store.set_share_token(a.id, "shared-token").await.unwrap();
        let err = store.set_share_token(b.id, "shared-token").await;
        assert!(matches!(err, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_set_share_token_missing_record() {
        let store = MemoryFileStore::new();
        let err = store.set_share_token(Uuid::new_v4(), "t").await;
        assert!(matches!(err, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_by_share_token_exact_match() {
        let store = MemoryFileStore::new();
        let record = store
            .create(new_record(Uuid::new_v4(), "a.txt"))
            .await
            .unwrap();
        store.set_share_token(record.id, "exact-token").await.unwrap();

        assert!(store
            .get_by_share_token("exact-token")
            .await
            .unwrap()
            .is_some());
        assert!(store
            .get_by_share_token("exact-toke")
            .await
            .unwrap()
            .is_none());
        assert!(store
            .get_by_share_token("EXACT-TOKEN")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_increment_is_monotonic_and_returns_new_count() {
        let store = MemoryFileStore::new();
        let record = store
            .create(new_record(Uuid::new_v4(), "a.txt"))
            .await
            .unwrap();

        assert_eq!(store.increment_download_count(record.id).await.unwrap(), 1);
        assert_eq!(store.increment_download_count(record.id).await.unwrap(), 2);
        assert_eq!(store.increment_download_count(record.id).await.unwrap(), 3);

        let fetched = store.get_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(fetched.download_count, 3);
    }

    /// 100 concurrent increments from a 0 baseline must land on exactly 100 -
    /// no lost updates.
    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_increments_lose_no_updates() {
        let store = Arc::new(MemoryFileStore::new());
        let record = store
            .create(new_record(Uuid::new_v4(), "popular.bin"))
            .await
            .unwrap();

        let mut handles = Vec::with_capacity(100);
        for _ in 0..100 {
            let store = store.clone();
            let id = record.id;
            handles.push(tokio::spawn(async move {
                store.increment_download_count(id).await.unwrap()
            }));
        }

        let mut seen = Vec::with_capacity(100);
        for handle in handles {
            seen.push(handle.await.unwrap());
        }

        let final_count = store
            .get_by_id(record.id)
            .await
            .unwrap()
            .unwrap()
            .download_count;
        assert_eq!(final_count, 100);

        // Every returned count is distinct: each increment observed its own value.
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 100);
    }

    #[tokio::test]
    async fn test_increment_missing_record() {
        let store = MemoryFileStore::new();
        let err = store.increment_download_count(Uuid::new_v4()).await;
        assert!(matches!(err, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let store = MemoryFileStore::new();
        let record = store
            .create(new_record(Uuid::new_v4(), "a.txt"))
            .await
            .unwrap();

        assert!(store.delete(record.id).await.unwrap());
        assert!(store.get_by_id(record.id).await.unwrap().is_none());
        assert!(!store.delete(record.id).await.unwrap());
    }

    /// Invariant check: share_token != null iff is_public, after every mutation.
    #[tokio::test]
    async fn test_share_visibility_invariant() {
        let store = MemoryFileStore::new();
        let record = store
            .create(new_record(Uuid::new_v4(), "a.txt"))
            .await
            .unwrap();
        assert_eq!(record.share_token.is_some(), record.is_public);

        let shared = store.set_share_token(record.id, "tok").await.unwrap();
        assert_eq!(shared.share_token.is_some(), shared.is_public);

        store.increment_download_count(record.id).await.unwrap();
        let fetched = store.get_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(fetched.share_token.is_some(), fetched.is_public);
    }
}
