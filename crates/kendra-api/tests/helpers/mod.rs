//! Test helpers: in-memory storage backends and a router wired like the
//! real server.
//!
//! Run from workspace root: `cargo test -p kendra-api`.

use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;
use kendra_api::setup::routes;
use kendra_api::AppState;
use kendra_storage::{
    CloudProvider, CloudStorage, FilesHelper, LocalStorage, SignedUrlAction, StorageError,
    StorageObjectMetadata, StorageResult,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// One call observed by a `MockStorage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Upload { bucket: String, key: String, size: usize },
    Sign { bucket: String, key: String, action: SignedUrlAction },
}

type FailureFn = Box<dyn Fn() -> StorageError + Send + Sync>;

/// Storage backend that answers with canned values (or a canned failure)
/// and records every call.
pub struct MockStorage {
    provider: CloudProvider,
    failure: Option<FailureFn>,
    calls: Mutex<Vec<Call>>,
}

impl MockStorage {
    pub fn new(provider: CloudProvider) -> Arc<Self> {
        Arc::new(Self {
            provider,
            failure: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing<F>(provider: CloudProvider, failure: F) -> Arc<Self>
    where
        F: Fn() -> StorageError + Send + Sync + 'static,
    {
        Arc::new(Self {
            provider,
            failure: Some(Box::new(failure)),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Metadata this backend returns for an upload.
    pub fn metadata_for(&self, bucket: &str, key: &str, size: usize) -> StorageObjectMetadata {
        StorageObjectMetadata {
            name: key.to_string(),
            container_name: bucket.to_string(),
            location: Some(format!("etag-{}", size)),
            size: size as u64,
            cloud_storage: self.provider,
        }
    }

    /// URL this backend signs for `key`.
    pub fn url_for(&self, bucket: &str, key: &str, action: SignedUrlAction) -> String {
        format!(
            "https://{}.storage.test/{}/{}?sp={}",
            self.provider.route_segment(),
            bucket,
            key,
            action.as_str()
        )
    }

    fn fail(&self) -> StorageResult<()> {
        match &self.failure {
            Some(failure) => Err(failure()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CloudStorage for MockStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
    ) -> StorageResult<StorageObjectMetadata> {
        self.calls.lock().unwrap().push(Call::Upload {
            bucket: bucket.to_string(),
            key: key.to_string(),
            size: data.len(),
        });
        self.fail()?;
        Ok(self.metadata_for(bucket, key, data.len()))
    }

    async fn signed_url(
        &self,
        bucket: &str,
        key: &str,
        action: SignedUrlAction,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        self.calls.lock().unwrap().push(Call::Sign {
            bucket: bucket.to_string(),
            key: key.to_string(),
            action,
        });
        self.fail()?;
        Ok(self.url_for(bucket, key, action))
    }

    fn provider(&self) -> CloudProvider {
        self.provider
    }
}

/// Build a test server over `files`.
pub fn test_server(files: FilesHelper) -> TestServer {
    server_for(AppState::new(files).with_error_details(true))
}

pub fn server_for(state: AppState) -> TestServer {
    let router = routes::app_router(Arc::new(state));
    TestServer::new(router).expect("Failed to build test server")
}

/// Helper with an Azure mock as the default provider.
pub fn azure_helper(azure: Arc<MockStorage>) -> FilesHelper {
    FilesHelper::new(CloudProvider::Azure).with_backend(azure)
}

/// Test server whose only backend is the local filesystem.
pub struct LocalApp {
    pub server: TestServer,
    pub _temp_dir: TempDir,
}

pub const LOCAL_BASE_URL: &str = "http://localhost:4000/local-files";

pub async fn local_app() -> LocalApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let local = Arc::new(
        LocalStorage::new(
            temp_dir.path(),
            LOCAL_BASE_URL.to_string(),
            Some("integration-secret".to_string()),
        )
        .await
        .expect("Failed to create local storage"),
    );

    let files = FilesHelper::new(CloudProvider::Local).with_backend(local.clone());
    let state = AppState::new(files)
        .with_local(Some(local))
        .with_error_details(true);

    LocalApp {
        server: server_for(state),
        _temp_dir: temp_dir,
    }
}

/// Strip the local base URL's origin so the path can be requested in-process.
pub fn local_path(url: &str) -> String {
    url.strip_prefix("http://localhost:4000")
        .expect("URL should point at the local backend")
        .to_string()
}
