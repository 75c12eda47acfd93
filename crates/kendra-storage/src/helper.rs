//! Files helper
//!
//! `FilesHelper` is the single entry point controllers use for storage work.
//! It resolves the provider and bucket for a request (falling back to the
//! configured defaults), validates keys, and hands URL signing to the
//! registered backend as one batch per request, keeping the caller's ordering.

use crate::keys::{generate_upload_key, validate_key};
use crate::traits::{
    CloudStorage, DownloadableUrl, PreSignedPayload, PreSignedUrl, SignedUrlAction, StorageError,
    StorageObjectMetadata, StorageResult,
};
use crate::CloudProvider;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_DOWNLOADABLE_URL_EXPIRY: Duration = Duration::from_secs(24 * 60 * 60);
const DEFAULT_PRESIGNED_URL_EXPIRY: Duration = Duration::from_secs(30 * 60);

#[derive(Clone)]
pub struct FilesHelper {
    backends: HashMap<CloudProvider, Arc<dyn CloudStorage>>,
    default_provider: CloudProvider,
    default_bucket: Option<String>,
    downloadable_url_expiry: Duration,
    presigned_url_expiry: Duration,
}

impl FilesHelper {
    pub fn new(default_provider: CloudProvider) -> Self {
        Self {
            backends: HashMap::new(),
            default_provider,
            default_bucket: None,
            downloadable_url_expiry: DEFAULT_DOWNLOADABLE_URL_EXPIRY,
            presigned_url_expiry: DEFAULT_PRESIGNED_URL_EXPIRY,
        }
    }

    /// Register `backend` under the provider tag it reports.
    pub fn with_backend(mut self, backend: Arc<dyn CloudStorage>) -> Self {
        self.backends.insert(backend.provider(), backend);
        self
    }

    pub fn with_default_bucket(mut self, bucket: Option<String>) -> Self {
        self.default_bucket = bucket.filter(|b| !b.trim().is_empty());
        self
    }

    pub fn with_downloadable_url_expiry(mut self, expiry: Duration) -> Self {
        self.downloadable_url_expiry = expiry;
        self
    }

    pub fn with_presigned_url_expiry(mut self, expiry: Duration) -> Self {
        self.presigned_url_expiry = expiry;
        self
    }

    pub fn default_provider(&self) -> CloudProvider {
        self.default_provider
    }

    /// Registered providers in a stable order.
    pub fn providers(&self) -> Vec<CloudProvider> {
        CloudProvider::ALL
            .into_iter()
            .filter(|p| self.backends.contains_key(p))
            .collect()
    }

    pub fn has_provider(&self, provider: CloudProvider) -> bool {
        self.backends.contains_key(&provider)
    }

    fn backend(&self, provider: Option<CloudProvider>) -> StorageResult<&Arc<dyn CloudStorage>> {
        let provider = provider.unwrap_or(self.default_provider);
        self.backends
            .get(&provider)
            .ok_or(StorageError::ProviderNotConfigured(provider))
    }

    fn bucket<'a>(&'a self, bucket: Option<&'a str>) -> StorageResult<&'a str> {
        bucket
            .filter(|b| !b.trim().is_empty())
            .or(self.default_bucket.as_deref())
            .ok_or_else(|| StorageError::InvalidRequest("bucket name is required".to_string()))
    }

    /// Upload `data` to `file_path` inside `bucket`.
    ///
    /// A missing path gets a generated `uploads/{uuid}` key; a missing bucket
    /// or provider falls back to the configured defaults.
    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    pub async fn upload(
        &self,
        data: Bytes,
        file_path: Option<&str>,
        bucket: Option<&str>,
        provider: Option<CloudProvider>,
    ) -> StorageResult<StorageObjectMetadata> {
        if data.is_empty() {
            return Err(StorageError::InvalidRequest("file is empty".to_string()));
        }

        let backend = self.backend(provider)?;
        let bucket = self.bucket(bucket)?;
        let key = match file_path.filter(|p| !p.trim().is_empty()) {
            Some(path) => path.to_string(),
            None => generate_upload_key(),
        };
        validate_key(&key)?;

        backend.upload(bucket, &key, data).await
    }

    /// Signed read URLs for `file_paths`, in request order.
    #[tracing::instrument(skip(self, file_paths), fields(count = file_paths.len()))]
    pub async fn get_downloadable_url(
        &self,
        file_paths: &[String],
        bucket: Option<&str>,
        provider: Option<CloudProvider>,
    ) -> StorageResult<Vec<DownloadableUrl>> {
        if file_paths.is_empty() {
            return Err(StorageError::InvalidRequest(
                "filePaths must not be empty".to_string(),
            ));
        }

        file_paths.iter().try_for_each(|path| validate_key(path))?;
        let backend = self.backend(provider)?;
        let bucket = self.bucket(bucket)?;

        let urls = backend
            .signed_urls(
                bucket,
                file_paths,
                SignedUrlAction::Read,
                self.downloadable_url_expiry,
            )
            .await?;

        Ok(file_paths
            .iter()
            .zip(urls)
            .map(|(path, url)| DownloadableUrl {
                file_path: path.clone(),
                url,
            })
            .collect())
    }

    /// Signed upload URLs for `file_names`, in request order.
    #[tracing::instrument(skip(self, file_names), fields(count = file_names.len()))]
    pub async fn pre_signed_urls(
        &self,
        file_names: &[String],
        bucket: Option<&str>,
        provider: Option<CloudProvider>,
    ) -> StorageResult<Vec<PreSignedUrl>> {
        if file_names.is_empty() {
            return Err(StorageError::InvalidRequest(
                "fileNames must not be empty".to_string(),
            ));
        }

        file_names.iter().try_for_each(|name| validate_key(name))?;
        let backend = self.backend(provider)?;
        let bucket = self.bucket(bucket)?;
        let cloud_storage = backend.provider();

        let urls = backend
            .signed_urls(
                bucket,
                file_names,
                SignedUrlAction::Write,
                self.presigned_url_expiry,
            )
            .await?;

        Ok(file_names
            .iter()
            .zip(urls)
            .map(|(name, url)| PreSignedUrl {
                file: name.clone(),
                url,
                payload: PreSignedPayload {
                    source_path: name.clone(),
                },
                cloud_storage,
            })
            .collect())
    }
}
