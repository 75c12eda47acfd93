//! Kendra Storage Library
//!
//! This crate provides the cloud storage abstraction used by the
//! `cloud-services` controllers: the `CloudStorage` trait, backends for Azure
//! Blob Storage, AWS S3 and Google Cloud Storage (through `object_store`), a
//! local filesystem backend for development, and `FilesHelper`, which routes
//! upload and URL-signing requests to the backend registered for a provider.
//!
//! # Object keys
//!
//! Keys are the caller-supplied file paths (e.g. `static/library/drafts.png`)
//! inside the caller-supplied bucket/container. Keys must not be empty,
//! contain `..` segments or start with `/`; validation is centralized in the
//! `keys` module so all backends stay consistent.

#[cfg(feature = "storage-azure")]
pub mod azure;
pub mod cloud;
pub mod factory;
#[cfg(feature = "storage-gcs")]
pub mod gcs;
pub mod helper;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-azure")]
pub use azure::AzureStorage;
pub use cloud::{ObjectStoreBackend, StoreBuilder};
pub use factory::{create_files_helper, StorageSetup};
#[cfg(feature = "storage-gcs")]
pub use gcs::GcsStorage;
pub use helper::FilesHelper;
pub use kendra_core::CloudProvider;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{
    CloudStorage, DownloadableUrl, PreSignedPayload, PreSignedUrl, SignedUrlAction,
    StorageError, StorageObjectMetadata, StorageResult,
};
