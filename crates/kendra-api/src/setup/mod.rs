//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! so tests can build the same router.

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use kendra_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.service_name(), config.environment())?;

    tracing::info!("Configuration loaded and validated successfully");

    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(
        AppState::new(storage.files)
            .with_local(storage.local)
            .with_service_name(config.service_name())
            .with_error_details(!config.is_production()),
    );

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
