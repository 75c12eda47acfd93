use crate::cloud::{ObjectStoreBackend, StoreBuilder};
use crate::traits::{StorageError, StorageResult};
use crate::CloudProvider;
use object_store::azure::{MicrosoftAzure, MicrosoftAzureBuilder};

/// Azure Blob Storage backend. The container is chosen per request.
pub type AzureStorage = ObjectStoreBackend<AzureStoreBuilder>;

/// Configures a `MicrosoftAzure` store for a storage account.
///
/// Without an account key the builder falls back to the ambient Azure
/// credentials (`AZURE_*` environment variables, managed identity).
#[derive(Clone)]
pub struct AzureStoreBuilder {
    account: String,
    access_key: Option<String>,
}

impl AzureStoreBuilder {
    pub fn new(account: impl Into<String>, access_key: Option<String>) -> Self {
        Self {
            account: account.into(),
            access_key,
        }
    }
}

impl StoreBuilder for AzureStoreBuilder {
    type Store = MicrosoftAzure;

    fn build(&self, container: &str) -> StorageResult<MicrosoftAzure> {
        let mut builder = MicrosoftAzureBuilder::from_env()
            .with_account(self.account.clone())
            .with_container_name(container);

        if let Some(ref key) = self.access_key {
            builder = builder.with_access_key(key.clone());
        }

        builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))
    }

    fn provider(&self) -> CloudProvider {
        CloudProvider::Azure
    }
}

impl AzureStorage {
    /// Create an Azure backend for `account`.
    pub fn azure(account: impl Into<String>, access_key: Option<String>) -> Self {
        ObjectStoreBackend::new(AzureStoreBuilder::new(account, access_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{CloudStorage, SignedUrlAction};
    use std::time::Duration;

    // base64("kendra-test-key")
    const TEST_KEY: &str = "a2VuZHJhLXRlc3Qta2V5";

    #[tokio::test]
    async fn test_signed_read_url_is_scoped_to_container() {
        let storage = AzureStorage::azure("samikshaprod", Some(TEST_KEY.to_string()));
        let url = storage
            .signed_url(
                "samiksha",
                "static/library/drafts.png",
                SignedUrlAction::Read,
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        assert!(url.starts_with(
            "https://samikshaprod.blob.core.windows.net/samiksha/static/library/drafts.png?"
        ));
        assert!(url.contains("sig="));
    }

    #[tokio::test]
    async fn test_signed_url_rejects_bad_key() {
        let storage = AzureStorage::azure("samikshaprod", Some(TEST_KEY.to_string()));
        let err = storage
            .signed_url(
                "samiksha",
                "../escape.png",
                SignedUrlAction::Write,
                Duration::from_secs(60),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_provider_tag() {
        let storage = AzureStorage::azure("samikshaprod", None);
        assert_eq!(storage.provider(), CloudProvider::Azure);
    }
}
