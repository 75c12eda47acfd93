//! OpenAPI documentation, served at `/api/openapi.json` and rendered by
//! RapiDoc at `/docs`.

use utoipa::OpenApi;

use crate::controller;
use crate::error;
use crate::handlers;
use crate::setup::routes::health;
use kendra_storage::{DownloadableUrl, PreSignedPayload, PreSignedUrl, StorageObjectMetadata};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kendra Cloud Services API",
        version = "0.1.0",
        description = "Upload files to cloud storage and issue signed download/upload URLs. Each provider (azure, aws, gcp, local) is mounted under /cloud-services/{provider}."
    ),
    paths(
        handlers::cloud_services::upload,
        handlers::cloud_services::get_downloadable_url,
        handlers::cloud_services::pre_signed_urls,
        handlers::cloud_services::upload_file,
        health::health_check,
    ),
    components(schemas(
        controller::DownloadUrlRequest,
        controller::PreSignedUrlRequest,
        error::ErrorEnvelope,
        error::ErrorObject,
        handlers::cloud_services::UploadForm,
        health::HealthCheckResponse,
        StorageObjectMetadata,
        DownloadableUrl,
        PreSignedUrl,
        PreSignedPayload,
        kendra_core::CloudProvider,
    )),
    tags(
        (name = "cloud-services", description = "File upload and signed URL endpoints"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_cloud_service_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/cloud-services/{provider}/upload",
            "/cloud-services/{provider}/getDownloadableUrl",
            "/cloud-services/{provider}/preSignedUrls",
            "/cloud-services/{provider}/uploadFile",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
