#[cfg(feature = "storage-azure")]
use crate::AzureStorage;
#[cfg(feature = "storage-gcs")]
use crate::GcsStorage;
#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{CloudProvider, CloudStorage, FilesHelper, StorageError, StorageResult};
use kendra_core::Config;
use std::sync::Arc;
use std::time::Duration;

/// Storage built from configuration.
pub struct StorageSetup {
    pub files: FilesHelper,
    /// Local backend, kept so the API can serve the URLs it signs
    #[cfg(feature = "storage-local")]
    pub local: Option<Arc<LocalStorage>>,
}

/// Create a files helper with a backend for every configured provider
pub async fn create_files_helper(config: &Config) -> StorageResult<StorageSetup> {
    let mut files = FilesHelper::new(config.default_provider())
        .with_default_bucket(config.default_bucket().map(String::from))
        .with_downloadable_url_expiry(Duration::from_secs(config.downloadable_url_expiry_secs()))
        .with_presigned_url_expiry(Duration::from_secs(config.presigned_url_expiry_secs()));

    #[cfg(feature = "storage-local")]
    let mut local = None;

    for provider in config.enabled_providers() {
        let backend: Arc<dyn CloudStorage> = match provider {
            #[cfg(feature = "storage-azure")]
            CloudProvider::Azure => {
                let account = config.azure_account_name().map(String::from).ok_or_else(|| {
                    StorageError::ConfigError("AZURE_ACCOUNT_NAME not configured".to_string())
                })?;
                Arc::new(AzureStorage::azure(
                    account,
                    config.azure_account_key().map(String::from),
                ))
            }

            #[cfg(feature = "storage-s3")]
            CloudProvider::Aws => {
                let region = config.aws_region().map(String::from).ok_or_else(|| {
                    StorageError::ConfigError("AWS_REGION not configured".to_string())
                })?;
                Arc::new(S3Storage::s3(region, config.s3_endpoint().map(String::from)))
            }

            #[cfg(feature = "storage-gcs")]
            CloudProvider::Gc => {
                let path = config
                    .gcp_service_account_path()
                    .map(String::from)
                    .ok_or_else(|| {
                        StorageError::ConfigError(
                            "GCP_SERVICE_ACCOUNT_PATH not configured".to_string(),
                        )
                    })?;
                Arc::new(GcsStorage::gcs(path))
            }

            #[cfg(feature = "storage-local")]
            CloudProvider::Local => {
                let base_path = config.local_storage_path().map(String::from).ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
                })?;
                let base_url = config
                    .local_storage_base_url()
                    .map(String::from)
                    .ok_or_else(|| {
                        StorageError::ConfigError(
                            "LOCAL_STORAGE_BASE_URL not configured".to_string(),
                        )
                    })?;

                let storage = Arc::new(
                    LocalStorage::new(
                        base_path,
                        base_url,
                        config.local_storage_signing_key().map(String::from),
                    )
                    .await?,
                );
                local = Some(storage.clone());
                storage
            }

            #[allow(unreachable_patterns)]
            other => {
                return Err(StorageError::ConfigError(format!(
                    "{} storage backend not available (feature not enabled)",
                    other
                )))
            }
        };

        tracing::info!(provider = %provider, "Cloud storage backend registered");
        files = files.with_backend(backend);
    }

    Ok(StorageSetup {
        files,
        #[cfg(feature = "storage-local")]
        local,
    })
}
