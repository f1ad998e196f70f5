//! Configuration module
//!
//! Service configuration is read from the environment (a `.env` file is loaded
//! first when present) and checked with `validate()` before the server starts.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8091;
const MAX_VIDEO_SIZE_MB: usize = 1024;
const MAX_THUMBNAIL_SIZE_MB: usize = 10;
const MEDIA_TOOL_TIMEOUT_SECS: u64 = 300;
const SIGNED_URL_TTL_SECS: u64 = 600;
const MIN_JWT_SECRET_LEN: usize = 32;
const LOCAL_BUCKET: &str = "tubely-local";

/// Tubely service configuration
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub environment: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    /// Externally reachable base URL of this service, without trailing slash
    pub public_base_url: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Upload pipeline
    pub scratch_dir: PathBuf,
    pub assets_root: Option<PathBuf>,
    pub max_video_size_bytes: usize,
    pub max_thumbnail_size_bytes: usize,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub media_tool_timeout_secs: u64,
    pub signed_url_ttl_secs: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.inner().environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().cors_origins
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().jwt_secret
    }

    pub fn public_base_url(&self) -> &str {
        self.inner().public_base_url.trim_end_matches('/')
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    /// Base URL local-backend signed links are rooted at. Falls back to the
    /// service's own `/media` route.
    pub fn local_storage_base_url(&self) -> String {
        self.inner()
            .local_storage_base_url
            .clone()
            .unwrap_or_else(|| format!("{}/media", self.public_base_url()))
    }

    /// Bucket name recorded in object references for the local backend.
    pub fn local_storage_bucket(&self) -> &str {
        self.s3_bucket().unwrap_or(LOCAL_BUCKET)
    }

    pub fn scratch_dir(&self) -> &std::path::Path {
        &self.inner().scratch_dir
    }

    pub fn assets_root(&self) -> Option<&std::path::Path> {
        self.inner().assets_root.as_deref()
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.inner().max_video_size_bytes
    }

    pub fn max_thumbnail_size_bytes(&self) -> usize {
        self.inner().max_thumbnail_size_bytes
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.inner().ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.inner().ffprobe_path
    }

    pub fn media_tool_timeout(&self) -> Duration {
        Duration::from_secs(self.inner().media_tool_timeout_secs)
    }

    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.inner().signed_url_ttl_secs)
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", server_port))
            .trim_end_matches('/')
            .to_string();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::S3,
        };

        let max_video_size_mb = env::var("MAX_VIDEO_SIZE_MB")
            .unwrap_or_else(|_| MAX_VIDEO_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_VIDEO_SIZE_MB);

        let max_thumbnail_size_mb = env::var("MAX_THUMBNAIL_SIZE_MB")
            .unwrap_or_else(|_| MAX_THUMBNAIL_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_THUMBNAIL_SIZE_MB);

        Ok(ServiceConfig {
            environment,
            server_port,
            cors_origins,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            public_base_url,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            scratch_dir: env::var("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            assets_root: env::var("ASSETS_ROOT").ok().map(PathBuf::from),
            max_video_size_bytes: max_video_size_mb * 1024 * 1024,
            max_thumbnail_size_bytes: max_thumbnail_size_mb * 1024 * 1024,
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            media_tool_timeout_secs: env::var("MEDIA_TOOL_TIMEOUT_SECS")
                .unwrap_or_else(|_| MEDIA_TOOL_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(MEDIA_TOOL_TIMEOUT_SECS),
            signed_url_ttl_secs: env::var("SIGNED_URL_TTL_SECS")
                .unwrap_or_else(|_| SIGNED_URL_TTL_SECS.to_string())
                .parse()
                .unwrap_or(SIGNED_URL_TTL_SECS),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            ));
        }

        if self.max_video_size_bytes == 0 || self.max_thumbnail_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_VIDEO_SIZE_MB and MAX_THUMBNAIL_SIZE_MB must be greater than zero"
            ));
        }

        if self.media_tool_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "MEDIA_TOOL_TIMEOUT_SECS must be greater than zero"
            ));
        }

        if self.signed_url_ttl_secs == 0 {
            return Err(anyhow::anyhow!("SIGNED_URL_TTL_SECS must be greater than zero"));
        }

        if !self.public_base_url.starts_with("http://")
            && !self.public_base_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "PUBLIC_BASE_URL must be an absolute http(s) URL"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> ServiceConfig {
        ServiceConfig {
            environment: "development".to_string(),
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            jwt_secret: "x".repeat(32),
            public_base_url: "http://localhost:8091/".to_string(),
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: Some("/tmp/tubely".to_string()),
            local_storage_base_url: None,
            scratch_dir: env::temp_dir(),
            assets_root: None,
            max_video_size_bytes: MAX_VIDEO_SIZE_MB * 1024 * 1024,
            max_thumbnail_size_bytes: MAX_THUMBNAIL_SIZE_MB * 1024 * 1024,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            media_tool_timeout_secs: MEDIA_TOOL_TIMEOUT_SECS,
            signed_url_ttl_secs: SIGNED_URL_TTL_SECS,
        }
    }

    #[test]
    fn test_valid_local_config() {
        assert!(local_config().validate().is_ok());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut config = local_config();
        config.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_s3_backend_requires_bucket_and_region() {
        let mut config = local_config();
        config.storage_backend = StorageBackend::S3;
        assert!(config.validate().is_err());

        config.s3_bucket = Some("tubely-media".to_string());
        assert!(config.validate().is_err());

        config.aws_region = Some("us-east-2".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = local_config();
        config.media_tool_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_getters_apply_defaults() {
        let config = Config(Box::new(local_config()));
        assert_eq!(config.public_base_url(), "http://localhost:8091");
        assert_eq!(
            config.local_storage_base_url(),
            "http://localhost:8091/media"
        );
        assert_eq!(config.local_storage_bucket(), LOCAL_BUCKET);
        assert_eq!(config.signed_url_ttl(), Duration::from_secs(600));
        assert_eq!(config.max_video_size_bytes(), 1 << 30);
        assert_eq!(config.max_thumbnail_size_bytes(), 10 << 20);
        assert!(!config.is_production());
    }
}
