use crate::keys::validate_key;
use crate::reference::ObjectReference;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::fs;
use tokio::io::AsyncWriteExt;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies local-backend download links.
///
/// Signature = hex(HMAC-SHA256(secret, "{bucket}/{key}\n{expires}")), where
/// `expires` is a unix timestamp in seconds.
#[derive(Clone)]
pub struct LocalUrlSigner {
    mac: HmacSha256,
}

impl LocalUrlSigner {
    pub fn new(secret: &[u8]) -> StorageResult<Self> {
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| StorageError::ConfigError(format!("Invalid signing secret: {}", e)))?;
        Ok(Self { mac })
    }

    fn tag(&self, bucket: &str, key: &str, expires: u64) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(bucket.as_bytes());
        mac.update(b"/");
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        mac
    }

    pub fn sign(&self, bucket: &str, key: &str, expires: u64) -> String {
        hex::encode(self.tag(bucket, key, expires).finalize().into_bytes())
    }

    /// Check a signature and its expiry against `now` (unix seconds).
    pub fn verify(&self, bucket: &str, key: &str, expires: u64, signature: &str, now: u64) -> bool {
        if now > expires {
            return false;
        }
        let Ok(signature) = hex::decode(signature) else {
            return false;
        };
        self.tag(bucket, key, expires)
            .verify_slice(&signature)
            .is_ok()
    }
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Local filesystem storage implementation
///
/// Objects live at `{base_path}/{bucket}/{key}` and are served through signed
/// links rooted at `base_url`.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    bucket: String,
    signer: LocalUrlSigner,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for object storage (e.g., "/var/lib/tubely/media")
    /// * `base_url` - Base URL signed links point at (e.g., "http://localhost:8091/media")
    /// * `bucket` - Bucket name recorded in object references
    /// * `signer` - Signer for download links
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        bucket: String,
        signer: LocalUrlSigner,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        if bucket.is_empty() || bucket.contains(['/', ',', '\\']) || bucket.contains("..") {
            return Err(StorageError::ConfigError(format!(
                "Invalid local bucket name: {}",
                bucket
            )));
        }

        fs::create_dir_all(base_path.join(&bucket))
            .await
            .map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create storage directory {}: {}",
                    base_path.display(),
                    e
                ))
            })?;

        Ok(LocalStorage {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket,
            signer,
        })
    }

    pub fn signer(&self) -> &LocalUrlSigner {
        &self.signer
    }

    /// Convert storage key to filesystem path with security validation
    fn key_to_path(&self, bucket: &str, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;
        if bucket != self.bucket {
            return Err(StorageError::NotFound(format!("{}/{}", bucket, storage_key)));
        }

        let bucket_root = self.base_path.join(bucket);
        let path = bucket_root.join(storage_key);

        if let (Ok(canonical), Ok(root)) = (path.canonicalize(), bucket_root.canonicalize()) {
            if canonical.strip_prefix(&root).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<ObjectReference> {
        let path = self.key_to_path(&self.bucket, key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        ObjectReference::new(self.bucket.clone(), key)
    }

    async fn put_file(
        &self,
        key: &str,
        content_type: &str,
        source: &Path,
    ) -> StorageResult<ObjectReference> {
        let path = self.key_to_path(&self.bucket, key)?;
        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();
        let size = fs::copy(source, &path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to copy into {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        ObjectReference::new(self.bucket.clone(), key)
    }

    async fn presign_get(
        &self,
        reference: &ObjectReference,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.key_to_path(reference.bucket(), reference.key())?;
        let expires = unix_now().saturating_add(expires_in.as_secs());
        let signature = self.signer.sign(reference.bucket(), reference.key(), expires);

        Ok(format!(
            "{}/{}/{}?expires={}&signature={}",
            self.base_url,
            reference.bucket(),
            reference.key(),
            expires,
            signature
        ))
    }

    async fn get_object(&self, key: &str) -> StorageResult<Bytes> {
        let path = self.key_to_path(&self.bucket, key)?;

        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::DownloadFailed(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
