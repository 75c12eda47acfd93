//! `object_store`-backed implementation shared by the Azure, S3 and GCS
//! backends.
//!
//! The provider modules only know how to configure a store for a bucket; the
//! upload and URL-signing paths live here once.

use crate::keys::{validate_bucket, validate_key};
use crate::traits::{
    CloudStorage, SignedUrlAction, StorageError, StorageObjectMetadata, StorageResult,
};
use crate::CloudProvider;
use async_trait::async_trait;
use bytes::Bytes;
use futures::future::try_join_all;
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStore, ObjectStoreExt, PutPayload, Result as ObjectResult};
use std::time::{Duration, Instant};

/// Builds a provider store scoped to one bucket/container.
pub trait StoreBuilder: Send + Sync {
    type Store: ObjectStore + Signer;

    fn build(&self, bucket: &str) -> StorageResult<Self::Store>;

    fn provider(&self) -> CloudProvider;
}

/// Cloud backend over any `object_store` provider that can sign URLs.
///
/// The bucket comes from the request, so a store is built per upload and
/// once per signing batch.
#[derive(Clone)]
pub struct ObjectStoreBackend<B> {
    builder: B,
}

impl<B: StoreBuilder> ObjectStoreBackend<B> {
    pub fn new(builder: B) -> Self {
        Self { builder }
    }

    fn store_for(&self, bucket: &str) -> StorageResult<B::Store> {
        validate_bucket(bucket)?;
        self.builder.build(bucket)
    }

    async fn sign(
        &self,
        store: &B::Store,
        bucket: &str,
        key: &str,
        action: SignedUrlAction,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let location = Path::from(key);

        let url_result: ObjectResult<_> = store
            .signed_url(action.method(), &location, expires_in)
            .await;

        let url = url_result
            .map_err(|e| {
                tracing::warn!(
                    error = %e,
                    provider = %self.builder.provider(),
                    bucket = %bucket,
                    key = %key,
                    action = action.as_str(),
                    "URL signing failed"
                );
                StorageError::SigningFailed(e.to_string())
            })?
            .to_string();

        Ok(url)
    }
}

#[async_trait]
impl<B: StoreBuilder> CloudStorage for ObjectStoreBackend<B> {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
    ) -> StorageResult<StorageObjectMetadata> {
        validate_key(key)?;
        let store = self.store_for(bucket)?;
        let provider = self.builder.provider();
        let size = data.len() as u64;
        let location = Path::from(key);
        let start = Instant::now();

        let result: ObjectResult<_> = store.put(&location, PutPayload::from(data)).await;

        let put = result.map_err(|e| {
            tracing::error!(
                error = %e,
                provider = %provider,
                bucket = %bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Cloud upload failed"
            );
            match e {
                ObjectStoreError::NotFound { .. } => StorageError::NotFound(bucket.to_string()),
                other => StorageError::UploadFailed(other.to_string()),
            }
        })?;

        tracing::info!(
            provider = %provider,
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloud upload successful"
        );

        Ok(StorageObjectMetadata {
            name: key.to_string(),
            container_name: bucket.to_string(),
            location: put.e_tag.or(put.version),
            size,
            cloud_storage: provider,
        })
    }

    async fn signed_url(
        &self,
        bucket: &str,
        key: &str,
        action: SignedUrlAction,
        expires_in: Duration,
    ) -> StorageResult<String> {
        validate_key(key)?;
        let store = self.store_for(bucket)?;
        self.sign(&store, bucket, key, action, expires_in).await
    }

    async fn signed_urls(
        &self,
        bucket: &str,
        keys: &[String],
        action: SignedUrlAction,
        expires_in: Duration,
    ) -> StorageResult<Vec<String>> {
        for key in keys {
            validate_key(key)?;
        }
        // One store (and credential cache) for the whole batch
        let store = self.store_for(bucket)?;

        try_join_all(
            keys.iter()
                .map(|key| self.sign(&store, bucket, key, action, expires_in)),
        )
        .await
    }

    fn provider(&self) -> CloudProvider {
        self.builder.provider()
    }
}
