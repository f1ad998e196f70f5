//! In-memory object store double.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tubely_storage::{
    validate_key, ObjectReference, Storage, StorageBackend, StorageError, StorageResult,
};

pub const TEST_BUCKET: &str = "tubely-test";

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Default)]
pub struct MockStorage {
    objects: Mutex<HashMap<String, StoredObject>>,
    fail_uploads: AtomicBool,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    pub fn objects(&self) -> HashMap<String, StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for MockStorage {
    fn bucket(&self) -> &str {
        TEST_BUCKET
    }

    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<ObjectReference> {
        validate_key(key)?;
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("bucket unavailable".to_string()));
        }
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                data,
            },
        );
        ObjectReference::new(TEST_BUCKET, key)
    }

    async fn put_file(
        &self,
        key: &str,
        content_type: &str,
        path: &Path,
    ) -> StorageResult<ObjectReference> {
        let data = tokio::fs::read(path).await?;
        self.put_object(key, content_type, Bytes::from(data)).await
    }

    async fn presign_get(
        &self,
        reference: &ObjectReference,
        expires_in: Duration,
    ) -> StorageResult<String> {
        Ok(format!(
            "https://{}.s3.test.local/{}?X-Amz-Expires={}&X-Amz-Signature=stub",
            reference.bucket(),
            reference.key(),
            expires_in.as_secs()
        ))
    }

    async fn get_object(&self, key: &str) -> StorageResult<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|o| o.data.clone())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
