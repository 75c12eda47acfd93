//! Route groups: per-provider cloud-service controllers and local file access.

use crate::constants::{cloud_services_path, LOCAL_FILES_PATH};
use crate::controller::CloudStorageController;
use crate::handlers::{cloud_services, local_files};
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use kendra_core::CloudProvider;
use std::sync::Arc;

/// Mount `/cloud-services/{segment}/...` for every registered provider.
///
/// Azure routes are always mounted; without an Azure backend they answer
/// with a provider-not-configured failure envelope.
pub fn cloud_service_routes(state: &AppState) -> Router {
    CloudProvider::ALL
        .into_iter()
        .filter(|p| *p == CloudProvider::Azure || state.files.has_provider(*p))
        .fold(Router::new(), |router, provider| {
            let controller = Arc::new(CloudStorageController::new(
                state.files.clone(),
                state.controller_context(provider),
            ));
            router.merge(provider_routes(&cloud_services_path(provider), controller))
        })
}

fn provider_routes(base: &str, controller: Arc<CloudStorageController>) -> Router {
    Router::new()
        .route(&format!("{}/upload", base), post(cloud_services::upload))
        .route(
            &format!("{}/getDownloadableUrl", base),
            post(cloud_services::get_downloadable_url),
        )
        .route(
            &format!("{}/preSignedUrls", base),
            post(cloud_services::pre_signed_urls),
        )
        .route(&format!("{}/uploadFile", base), post(cloud_services::upload_file))
        .with_state(controller)
}

/// Routes the local backend's signed URLs point at (only when it is registered).
pub fn local_file_routes(state: &AppState) -> Router {
    let Some(storage) = state.local.clone() else {
        return Router::new();
    };

    let local_state = local_files::LocalFilesState {
        storage,
        expose_error_details: state.expose_error_details,
    };

    Router::new()
        .route(
            &format!("{}/{{bucket}}/{{*key}}", LOCAL_FILES_PATH),
            get(local_files::download).put(local_files::upload),
        )
        .with_state(local_state)
}
