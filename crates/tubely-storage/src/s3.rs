use crate::keys::validate_key;
use crate::reference::ObjectReference;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Bytes buffered per multipart part when streaming a file upload
const UPLOAD_PART_BYTES: usize = 8 * 1024 * 1024;

fn content_type_attributes(content_type: &str) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert(Attribute::ContentType, content_type.to_string().into());
    attributes
}

/// Stream `source` into `location`. Files smaller than `part_bytes` go up in a
/// single PUT, larger ones as a multipart upload holding one part in memory.
async fn stream_file(
    store: Arc<dyn ObjectStore>,
    location: Path,
    content_type: &str,
    source: &std::path::Path,
    part_bytes: usize,
) -> StorageResult<u64> {
    let mut file = tokio::fs::File::open(source).await?;
    let mut writer = BufWriter::with_capacity(store, location, part_bytes)
        .with_attributes(content_type_attributes(content_type));

    let copied = tokio::io::copy(&mut file, &mut writer).await;
    let size = match copied {
        Ok(size) => size,
        Err(e) => {
            if let Err(abort_err) = writer.abort().await {
                tracing::warn!(error = %abort_err, "Failed to abort multipart upload");
            }
            return Err(StorageError::UploadFailed(e.to_string()));
        }
    };

    writer
        .shutdown()
        .await
        .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

    Ok(size)
}

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<AmazonS3>,
    builder: AmazonS3Builder,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name new objects are written to
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env().with_region(region);

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .clone()
            .with_bucket_name(bucket.clone())
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store: Arc::new(store),
            builder,
            bucket,
        })
    }

    /// Store handle for `bucket`. References written under an earlier bucket
    /// configuration still sign against the bucket they name.
    fn store_for(&self, bucket: &str) -> StorageResult<Arc<AmazonS3>> {
        if bucket == self.bucket {
            return Ok(self.store.clone());
        }

        tracing::debug!(bucket = %bucket, "Building S3 client for foreign bucket");
        let store = self
            .builder
            .clone()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;
        Ok(Arc::new(store))
    }
}

#[async_trait]
impl Storage for S3Storage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<ObjectReference> {
        validate_key(key)?;
        let size = data.len() as u64;
        let location = Path::from(key.to_string());
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put_opts(
                &location,
                PutPayload::from(data),
                PutOptions::from(content_type_attributes(content_type)),
            )
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        ObjectReference::new(self.bucket.clone(), key)
    }

    async fn put_file(
        &self,
        key: &str,
        content_type: &str,
        source: &std::path::Path,
    ) -> StorageResult<ObjectReference> {
        validate_key(key)?;
        let start = std::time::Instant::now();
        let store: Arc<dyn ObjectStore> = self.store.clone();

        let size = stream_file(
            store,
            Path::from(key.to_string()),
            content_type,
            source,
            UPLOAD_PART_BYTES,
        )
        .await
        .inspect_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 streamed upload failed"
            );
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        ObjectReference::new(self.bucket.clone(), key)
    }

    async fn presign_get(
        &self,
        reference: &ObjectReference,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let store = self.store_for(reference.bucket())?;
        let location = Path::from(reference.key().to_string());

        let url_result: ObjectResult<_> = store
            .signed_url(Method::GET, &location, expires_in)
            .await;

        let url = url_result
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %reference.bucket(),
                    key = %reference.key(),
                    "S3 presign failed"
                );
                StorageError::PresignFailed(e.to_string())
            })?
            .to_string();

        Ok(url)
    }

    async fn get_object(&self, key: &str) -> StorageResult<Bytes> {
        let start = std::time::Instant::now();
        let location = Path::from(key.to_string());

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 download failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = bytes.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(bytes)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
