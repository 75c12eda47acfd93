//! Kendra Core Library
//!
//! This crate provides the configuration, error taxonomy, provider tags and the
//! HTTP status/message catalog shared by the storage and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod provider;

// Re-export commonly used types
pub use config::{BaseConfig, Config, StorageConfig};
pub use constants::{ApiMessages, HttpStatus};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use provider::CloudProvider;
