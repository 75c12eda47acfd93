use crate::cloud::{ObjectStoreBackend, StoreBuilder};
use crate::traits::{StorageError, StorageResult};
use crate::CloudProvider;
use object_store::aws::{AmazonS3, AmazonS3Builder};

/// AWS S3 backend (or any S3-compatible provider). The bucket is chosen per
/// request.
pub type S3Storage = ObjectStoreBackend<S3StoreBuilder>;

#[derive(Clone)]
pub struct S3StoreBuilder {
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3StoreBuilder {
    /// # Arguments
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn new(region: impl Into<String>, endpoint_url: Option<String>) -> Self {
        Self {
            region: region.into(),
            endpoint_url,
        }
    }
}

impl StoreBuilder for S3StoreBuilder {
    type Store = AmazonS3;

    fn build(&self, bucket: &str) -> StorageResult<AmazonS3> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(self.region.clone())
            .with_bucket_name(bucket);

        if let Some(ref endpoint) = self.endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))
    }

    fn provider(&self) -> CloudProvider {
        CloudProvider::Aws
    }
}

impl S3Storage {
    pub fn s3(region: impl Into<String>, endpoint_url: Option<String>) -> Self {
        ObjectStoreBackend::new(S3StoreBuilder::new(region, endpoint_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::CloudStorage;

    #[test]
    fn test_builder_accepts_custom_endpoint() {
        let builder = S3StoreBuilder::new(
            "ap-south-1",
            Some("http://localhost:9000".to_string()),
        );
        assert!(builder.build("sl-unnati-storage").is_ok());
        assert_eq!(builder.provider(), CloudProvider::Aws);
    }

    #[tokio::test]
    async fn test_upload_rejects_invalid_bucket() {
        let storage = S3Storage::s3("ap-south-1", None);
        let err = storage
            .upload("bad bucket", "a.png", bytes::Bytes::from_static(b"abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidRequest(_)));
    }
}
