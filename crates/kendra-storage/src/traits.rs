//! Storage abstraction trait
//!
//! This module defines the `CloudStorage` trait that all storage backends must
//! implement, together with the values the file helper hands back to
//! controllers.

use crate::CloudProvider;
use async_trait::async_trait;
use bytes::Bytes;
use futures::future::try_join_all;
use kendra_core::{ErrorMetadata, LogLevel};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Cloud storage provider {0} is not configured")]
    ProviderNotConfigured(CloudProvider),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("URL signing failed: {0}")]
    SigningFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// HTTP status carried by the failure, if the helper assigns one.
    pub fn status(&self) -> Option<u16> {
        match self {
            StorageError::InvalidRequest(_) | StorageError::InvalidKey(_) => Some(400),
            StorageError::NotFound(_) => Some(404),
            StorageError::InvalidSignature(_) => Some(403),
            _ => None,
        }
    }

    /// Message safe to show to clients. Configuration and IO failures keep
    /// their details (paths, credentials) out of responses.
    pub fn message(&self) -> Option<String> {
        match self {
            StorageError::IoError(_) | StorageError::ConfigError(_) => None,
            other => Some(other.to_string()),
        }
    }
}

impl ErrorMetadata for StorageError {
    fn http_status_code(&self) -> Option<u16> {
        self.status()
    }

    fn client_message(&self) -> Option<String> {
        self.message()
    }

    fn error_code(&self) -> &'static str {
        match self {
            StorageError::InvalidRequest(_) => "INVALID_REQUEST",
            StorageError::InvalidKey(_) => "INVALID_KEY",
            StorageError::NotFound(_) => "NOT_FOUND",
            StorageError::InvalidSignature(_) => "INVALID_SIGNATURE",
            StorageError::ProviderNotConfigured(_) => "PROVIDER_NOT_CONFIGURED",
            StorageError::UploadFailed(_) => "UPLOAD_FAILED",
            StorageError::SigningFailed(_) => "SIGNING_FAILED",
            StorageError::IoError(_) => "IO_ERROR",
            StorageError::ConfigError(_) => "CONFIGURATION_ERROR",
        }
    }

    fn is_sensitive(&self) -> bool {
        matches!(self, StorageError::IoError(_) | StorageError::ConfigError(_))
    }

    fn log_level(&self) -> LogLevel {
        match self {
            StorageError::InvalidRequest(_)
            | StorageError::InvalidKey(_)
            | StorageError::NotFound(_)
            | StorageError::InvalidSignature(_) => LogLevel::Debug,
            StorageError::ProviderNotConfigured(_) => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }

    fn detailed_message(&self) -> String {
        self.to_string()
    }

    fn error_type(&self) -> &'static str {
        "ProviderError"
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// What a signed URL grants its holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignedUrlAction {
    /// Download (HTTP GET)
    Read,
    /// Direct upload (HTTP PUT)
    Write,
}

impl SignedUrlAction {
    pub fn method(&self) -> http::Method {
        match self {
            SignedUrlAction::Read => http::Method::GET,
            SignedUrlAction::Write => http::Method::PUT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignedUrlAction::Read => "read",
            SignedUrlAction::Write => "write",
        }
    }
}

impl std::str::FromStr for SignedUrlAction {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(SignedUrlAction::Read),
            "write" => Ok(SignedUrlAction::Write),
            other => Err(StorageError::InvalidSignature(format!(
                "unknown action: {}",
                other
            ))),
        }
    }
}

/// Metadata describing a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageObjectMetadata {
    /// Object key inside the container
    pub name: String,
    /// Bucket/container the object was written to
    pub container_name: String,
    /// Provider-issued version marker (ETag or version id) or local path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub size: u64,
    pub cloud_storage: CloudProvider,
}

/// A read URL for one requested file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadableUrl {
    pub file_path: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreSignedPayload {
    pub source_path: String,
}

/// An upload URL for one requested file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreSignedUrl {
    pub file: String,
    pub url: String,
    pub payload: PreSignedPayload,
    pub cloud_storage: CloudProvider,
}

/// Storage abstraction trait
///
/// Every provider (Azure, S3, GCS, local filesystem) implements this trait so
/// the file helper can route requests by provider tag without knowing SDK
/// details. Buckets are chosen per call.
#[async_trait]
pub trait CloudStorage: Send + Sync {
    /// Store `data` at `key` inside `bucket`.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
    ) -> StorageResult<StorageObjectMetadata>;

    /// Generate a time-limited URL granting `action` on `key`.
    async fn signed_url(
        &self,
        bucket: &str,
        key: &str,
        action: SignedUrlAction,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Sign every key in `keys` inside one bucket, in order.
    ///
    /// Backends with per-bucket setup cost (client construction, credential
    /// fetches) override this to pay it once per batch.
    async fn signed_urls(
        &self,
        bucket: &str,
        keys: &[String],
        action: SignedUrlAction,
        expires_in: Duration,
    ) -> StorageResult<Vec<String>> {
        try_join_all(
            keys.iter()
                .map(|key| self.signed_url(bucket, key, action, expires_in)),
        )
        .await
    }

    /// Provider tag served by this backend
    fn provider(&self) -> CloudProvider;
}
