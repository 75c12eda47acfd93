use crate::cloud::{ObjectStoreBackend, StoreBuilder};
use crate::traits::{StorageError, StorageResult};
use crate::CloudProvider;
use object_store::gcp::{GoogleCloudStorage, GoogleCloudStorageBuilder};

/// Google Cloud Storage backend. Signing needs a service account key file.
pub type GcsStorage = ObjectStoreBackend<GcsStoreBuilder>;

#[derive(Clone)]
pub struct GcsStoreBuilder {
    service_account_path: String,
}

impl GcsStoreBuilder {
    pub fn new(service_account_path: impl Into<String>) -> Self {
        Self {
            service_account_path: service_account_path.into(),
        }
    }
}

impl StoreBuilder for GcsStoreBuilder {
    type Store = GoogleCloudStorage;

    fn build(&self, bucket: &str) -> StorageResult<GoogleCloudStorage> {
        GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .with_service_account_path(self.service_account_path.clone())
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))
    }

    fn provider(&self) -> CloudProvider {
        CloudProvider::Gc
    }
}

impl GcsStorage {
    pub fn gcs(service_account_path: impl Into<String>) -> Self {
        ObjectStoreBackend::new(GcsStoreBuilder::new(service_account_path))
    }
}
