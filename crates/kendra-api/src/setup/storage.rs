//! Storage setup

use anyhow::{Context, Result};
use kendra_core::Config;
use kendra_storage::{create_files_helper, StorageSetup};

/// Build the files helper with every configured provider backend.
pub async fn setup_storage(config: &Config) -> Result<StorageSetup> {
    let setup = create_files_helper(config)
        .await
        .context("Failed to initialize cloud storage")?;

    tracing::info!(
        providers = ?setup.files.providers(),
        default_provider = %config.default_provider(),
        default_bucket = ?config.default_bucket(),
        "Cloud storage initialized"
    );

    Ok(setup)
}
