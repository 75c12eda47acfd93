//! Configuration module
//!
//! This module provides configuration structures for the API server and the
//! cloud storage helper. Values come from the process environment (with
//! `.env` support through `dotenvy`) and are validated up front.

use std::env;

use crate::error::AppError;
use crate::provider::CloudProvider;

const SERVER_PORT: u16 = 4000;
const MAX_REQUEST_BODY_MB: usize = 100;
const DOWNLOADABLE_URL_EXPIRY_SECS: u64 = 24 * 60 * 60;
const PRESIGNED_URL_EXPIRY_SECS: u64 = 30 * 60;

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub max_request_body_bytes: usize,
    pub service_name: String,
}

/// Cloud storage helper configuration
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub default_provider: CloudProvider,
    pub default_bucket: Option<String>,
    pub downloadable_url_expiry_secs: u64,
    pub presigned_url_expiry_secs: u64,
    // Azure Blob Storage
    pub azure_account_name: Option<String>,
    pub azure_account_key: Option<String>,
    // AWS S3 (or S3-compatible providers through S3_ENDPOINT)
    pub aws_region: Option<String>,
    pub s3_endpoint: Option<String>,
    // Google Cloud Storage
    pub gcp_service_account_path: Option<String>,
    // Local filesystem (development)
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub local_storage_signing_key: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from the environment and validate it.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).filter(|s| !s.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: var("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| AppError::Config("PORT must be a valid number".to_string()))?,
            cors_origins,
            environment,
            max_request_body_bytes: var("MAX_REQUEST_BODY_MB")
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(MAX_REQUEST_BODY_MB)
                .checked_mul(1024 * 1024)
                .ok_or_else(|| AppError::Config("MAX_REQUEST_BODY_MB is too large".to_string()))?,
            service_name: var("SERVICE_NAME").unwrap_or_else(|| "kendra".to_string()),
        };

        let default_provider = match non_empty("DEFAULT_CLOUD_STORAGE") {
            Some(tag) => tag
                .parse()
                .map_err(|e: anyhow::Error| AppError::Config(e.to_string()))?,
            None => CloudProvider::Azure,
        };

        let storage = StorageConfig {
            default_provider,
            default_bucket: non_empty("DEFAULT_BUCKET_NAME"),
            downloadable_url_expiry_secs: var("DOWNLOADABLE_URL_EXPIRY_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DOWNLOADABLE_URL_EXPIRY_SECS),
            presigned_url_expiry_secs: var("PRESIGNED_URL_EXPIRY_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(PRESIGNED_URL_EXPIRY_SECS),
            azure_account_name: non_empty("AZURE_ACCOUNT_NAME")
                .or_else(|| non_empty("AZURE_STORAGE_ACCOUNT_NAME")),
            azure_account_key: non_empty("AZURE_ACCOUNT_KEY")
                .or_else(|| non_empty("AZURE_STORAGE_ACCOUNT_KEY")),
            aws_region: non_empty("AWS_REGION"),
            s3_endpoint: non_empty("S3_ENDPOINT"),
            gcp_service_account_path: non_empty("GCP_SERVICE_ACCOUNT_PATH"),
            local_storage_path: non_empty("LOCAL_STORAGE_PATH"),
            local_storage_base_url: non_empty("LOCAL_STORAGE_BASE_URL"),
            local_storage_signing_key: non_empty("LOCAL_STORAGE_SIGNING_KEY"),
        };

        let config = Config { base, storage };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(AppError::Config(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
                    .to_string(),
            ));
        }

        if self.storage.downloadable_url_expiry_secs == 0
            || self.storage.presigned_url_expiry_secs == 0
        {
            return Err(AppError::Config(
                "DOWNLOADABLE_URL_EXPIRY_SECS and PRESIGNED_URL_EXPIRY_SECS must be greater than zero"
                    .to_string(),
            ));
        }

        if self.storage.local_storage_path.is_some() {
            if self.storage.local_storage_base_url.is_none() {
                return Err(AppError::Config(
                    "LOCAL_STORAGE_BASE_URL must be set when LOCAL_STORAGE_PATH is set"
                        .to_string(),
                ));
            }
            if self.is_production() && self.storage.local_storage_signing_key.is_none() {
                return Err(AppError::Config(
                    "LOCAL_STORAGE_SIGNING_KEY must be set in production"
                        .to_string(),
                ));
            }
        }

        let enabled = self.enabled_providers();
        if enabled.is_empty() {
            return Err(AppError::Config(
                "No cloud storage provider configured. Set AZURE_ACCOUNT_NAME, AWS_REGION, GCP_SERVICE_ACCOUNT_PATH or LOCAL_STORAGE_PATH"
                    .to_string(),
            ));
        }
        if !enabled.contains(&self.storage.default_provider) {
            return Err(AppError::Config(format!(
                "DEFAULT_CLOUD_STORAGE is {} but that provider is not configured",
                self.storage.default_provider
            )));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Providers that have enough configuration to build a backend.
    pub fn enabled_providers(&self) -> Vec<CloudProvider> {
        CloudProvider::ALL
            .into_iter()
            .filter(|provider| match provider {
                CloudProvider::Azure => self.storage.azure_account_name.is_some(),
                CloudProvider::Aws => self.storage.aws_region.is_some(),
                CloudProvider::Gc => self.storage.gcp_service_account_path.is_some(),
                CloudProvider::Local => self.storage.local_storage_path.is_some(),
            })
            .collect()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn service_name(&self) -> &str {
        &self.base.service_name
    }

    pub fn max_request_body_bytes(&self) -> usize {
        self.base.max_request_body_bytes
    }

    pub fn default_provider(&self) -> CloudProvider {
        self.storage.default_provider
    }

    pub fn default_bucket(&self) -> Option<&str> {
        self.storage.default_bucket.as_deref()
    }

    pub fn downloadable_url_expiry_secs(&self) -> u64 {
        self.storage.downloadable_url_expiry_secs
    }

    pub fn presigned_url_expiry_secs(&self) -> u64 {
        self.storage.presigned_url_expiry_secs
    }

    pub fn azure_account_name(&self) -> Option<&str> {
        self.storage.azure_account_name.as_deref()
    }

    pub fn azure_account_key(&self) -> Option<&str> {
        self.storage.azure_account_key.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.storage.aws_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.storage.s3_endpoint.as_deref()
    }

    pub fn gcp_service_account_path(&self) -> Option<&str> {
        self.storage.gcp_service_account_path.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.storage.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.storage.local_storage_base_url.as_deref()
    }

    pub fn local_storage_signing_key(&self) -> Option<&str> {
        self.storage.local_storage_signing_key.as_deref()
    }
}
