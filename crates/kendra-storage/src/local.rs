use crate::keys::{validate_bucket, validate_key};
use crate::traits::{
    CloudStorage, SignedUrlAction, StorageError, StorageObjectMetadata, StorageResult,
};
use crate::CloudProvider;
use async_trait::async_trait;
use bytes::Bytes;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem storage implementation
///
/// Buckets map to directories under `base_path`. Signed URLs point at
/// `{base_url}/{bucket}/{key}` and carry `action`, `expires` and `signature`
/// query parameters; the API verifies them with [`LocalStorage::verify_signature`]
/// before serving the file.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    signing_key: Vec<u8>,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/kendra/files")
    /// * `base_url` - Base URL signed links point at (e.g., "http://localhost:4000/local-files")
    /// * `signing_key` - HMAC key for signed URLs; a random per-process key is
    ///   used when absent, so links do not survive restarts
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        signing_key: Option<String>,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        let signing_key = match signing_key {
            Some(key) => key.into_bytes(),
            None => {
                tracing::warn!("LOCAL_STORAGE_SIGNING_KEY not set, using an ephemeral key");
                Uuid::new_v4().as_bytes().to_vec()
            }
        };

        Ok(LocalStorage {
            base_path,
            base_url,
            signing_key,
        })
    }

    /// Convert bucket and key to a filesystem path with security validation
    ///
    /// Rejects keys that could escape the base storage directory, including
    /// through symlinks that already exist on disk.
    fn key_to_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        validate_bucket(bucket)?;
        validate_key(key)?;

        let path = self.base_path.join(bucket).join(key);

        let base_canonical = self.base_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        if let Ok(canonical) = path.canonicalize() {
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        let encoded_key = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(bucket),
            encoded_key
        )
    }

    fn mac(
        &self,
        bucket: &str,
        key: &str,
        action: SignedUrlAction,
        expires: u64,
    ) -> StorageResult<Hmac<Sha256>> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.signing_key)
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?;
        mac.update(format!("{}\n{}\n{}\n{}", action.as_str(), bucket, key, expires).as_bytes());
        Ok(mac)
    }

    /// Check a signed URL's query parameters for `bucket`/`key`.
    pub fn verify_signature(
        &self,
        bucket: &str,
        key: &str,
        action: SignedUrlAction,
        expires: u64,
        signature: &str,
    ) -> StorageResult<()> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        if now > expires {
            return Err(StorageError::InvalidSignature("signed URL has expired".to_string()));
        }

        let tag = hex::decode(signature)
            .map_err(|_| StorageError::InvalidSignature("malformed signature".to_string()))?;

        self.mac(bucket, key, action, expires)?
            .verify_slice(&tag)
            .map_err(|_| StorageError::InvalidSignature("signature mismatch".to_string()))
    }

    /// Read a stored file.
    pub async fn read(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        let path = self.key_to_path(bucket, key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CloudStorage for LocalStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
    ) -> StorageResult<StorageObjectMetadata> {
        let path = self.key_to_path(bucket, key)?;
        let size = data.len() as u64;

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", key, e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", key, e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", key, e))
        })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local upload successful"
        );

        Ok(StorageObjectMetadata {
            name: key.to_string(),
            container_name: bucket.to_string(),
            location: Some(self.object_url(bucket, key)),
            size,
            cloud_storage: CloudProvider::Local,
        })
    }

    async fn signed_url(
        &self,
        bucket: &str,
        key: &str,
        action: SignedUrlAction,
        expires_in: Duration,
    ) -> StorageResult<String> {
        // Validates bucket and key
        self.key_to_path(bucket, key)?;

        let expires = SystemTime::now()
            .checked_add(expires_in)
            .unwrap_or(SystemTime::UNIX_EPOCH)
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let signature = hex::encode(
            self.mac(bucket, key, action, expires)?
                .finalize()
                .into_bytes(),
        );

        Ok(format!(
            "{}?action={}&expires={}&signature={}",
            self.object_url(bucket, key),
            action.as_str(),
            expires,
            signature
        ))
    }

    fn provider(&self) -> CloudProvider {
        CloudProvider::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const BASE_URL: &str = "http://localhost:4000/local-files";

    async fn storage(dir: &Path) -> LocalStorage {
        LocalStorage::new(dir, BASE_URL.to_string(), Some("test-secret".to_string()))
            .await
            .unwrap()
    }

    fn query_param<'a>(url: &'a str, name: &str) -> &'a str {
        let query = url.split_once('?').unwrap().1;
        query
            .split('&')
            .find_map(|pair| pair.strip_prefix(&format!("{}=", name)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_local_storage_upload_read() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let meta = storage
            .upload("samiksha", "static/library/drafts.png", Bytes::from_static(b"test data"))
            .await
            .unwrap();

        assert_eq!(meta.name, "static/library/drafts.png");
        assert_eq!(meta.container_name, "samiksha");
        assert_eq!(meta.size, 9);
        assert_eq!(meta.cloud_storage, CloudProvider::Local);
        assert_eq!(
            meta.location.as_deref(),
            Some("http://localhost:4000/local-files/samiksha/static/library/drafts.png")
        );

        let data = storage.read("samiksha", "static/library/drafts.png").await.unwrap();
        assert_eq!(&data[..], b"test data");
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let result = storage
            .upload("samiksha", "../../../etc/passwd", Bytes::from_static(b"x"))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.read("samiksha", "/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.read("..", "passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let result = storage.read("samiksha", "nonexistent/file.txt").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_signed_url_verifies() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let url = storage
            .signed_url(
                "samiksha",
                "N4X6E2/N4X6E2.png",
                SignedUrlAction::Write,
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        assert!(url.starts_with("http://localhost:4000/local-files/samiksha/N4X6E2/N4X6E2.png?"));
        assert_eq!(query_param(&url, "action"), "write");

        let expires: u64 = query_param(&url, "expires").parse().unwrap();
        let signature = query_param(&url, "signature");

        assert!(storage
            .verify_signature(
                "samiksha",
                "N4X6E2/N4X6E2.png",
                SignedUrlAction::Write,
                expires,
                signature,
            )
            .is_ok());

        // Signature does not transfer to another action, key or expiry
        let wrong_action = storage.verify_signature(
            "samiksha",
            "N4X6E2/N4X6E2.png",
            SignedUrlAction::Read,
            expires,
            signature,
        );
        assert!(matches!(wrong_action, Err(StorageError::InvalidSignature(_))));

        let wrong_key = storage.verify_signature(
            "samiksha",
            "other.png",
            SignedUrlAction::Write,
            expires,
            signature,
        );
        assert!(matches!(wrong_key, Err(StorageError::InvalidSignature(_))));

        let wrong_expiry = storage.verify_signature(
            "samiksha",
            "N4X6E2/N4X6E2.png",
            SignedUrlAction::Write,
            expires + 1,
            signature,
        );
        assert!(matches!(wrong_expiry, Err(StorageError::InvalidSignature(_))));
    }

    #[tokio::test]
    async fn test_expired_signature_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let result = storage.verify_signature(
            "samiksha",
            "a.png",
            SignedUrlAction::Read,
            1,
            "00",
        );
        assert!(matches!(result, Err(StorageError::InvalidSignature(_))));
        assert_eq!(result.unwrap_err().status(), Some(403));
    }

    #[tokio::test]
    async fn test_key_segments_are_encoded() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let url = storage
            .signed_url(
                "samiksha",
                "reports/q1 summary.csv",
                SignedUrlAction::Read,
                Duration::from_secs(60),
            )
            .await
            .unwrap();
        assert!(url.contains("/samiksha/reports/q1%20summary.csv?"));
    }
}
