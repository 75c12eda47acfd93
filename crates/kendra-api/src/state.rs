use crate::controller::ControllerContext;
use kendra_core::{ApiMessages, CloudProvider};
use kendra_storage::{FilesHelper, LocalStorage};
use std::sync::Arc;

/// Shared application state
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub files: Arc<FilesHelper>,
    /// Present when the local backend is registered
    pub local: Option<Arc<LocalStorage>>,
    pub messages: ApiMessages,
    pub service_name: String,
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(files: FilesHelper) -> Self {
        Self {
            files: Arc::new(files),
            local: None,
            messages: ApiMessages::default(),
            service_name: "kendra".to_string(),
            expose_error_details: false,
        }
    }

    pub fn with_local(mut self, local: Option<Arc<LocalStorage>>) -> Self {
        self.local = local;
        self
    }

    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.expose_error_details = expose;
        self
    }

    /// Context for the controller serving `provider`.
    pub fn controller_context(&self, provider: CloudProvider) -> ControllerContext {
        ControllerContext {
            provider,
            messages: self.messages.clone(),
            expose_error_details: self.expose_error_details,
        }
    }
}
