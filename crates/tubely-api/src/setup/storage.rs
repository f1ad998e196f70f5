//! Storage setup and initialization

use anyhow::Result;
use std::sync::Arc;
use tubely_core::{Config, StorageBackend};
use tubely_storage::{create_storage, LocalUrlSigner, Storage};

/// Setup storage; the local backend also yields the signer its `/media` links are checked with.
pub async fn setup_storage(
    config: &Config,
) -> Result<(Arc<dyn Storage>, Option<LocalUrlSigner>)> {
    tracing::info!("Initializing storage abstraction...");
    let storage = create_storage(config).await?;
    let backend_type = storage.backend_type();
    tracing::info!(
        backend = ?backend_type,
        bucket = storage.bucket(),
        "Storage abstraction initialized successfully"
    );

    let local_signer = if backend_type == StorageBackend::Local {
        Some(LocalUrlSigner::new(config.jwt_secret().as_bytes())?)
    } else {
        None
    };

    Ok((storage, local_signer))
}
