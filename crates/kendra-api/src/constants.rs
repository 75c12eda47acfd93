//! API path constants

/// Prefix under which each provider's controller routes are nested.
pub const CLOUD_SERVICES_BASE: &str = "/cloud-services";

/// Route the local backend's signed URLs point at.
pub const LOCAL_FILES_PATH: &str = "/local-files";

pub const OPENAPI_JSON_PATH: &str = "/api/openapi.json";

pub const DOCS_PATH: &str = "/docs";

/// Route prefix for a provider, e.g. `/cloud-services/azure`.
pub fn cloud_services_path(provider: kendra_core::CloudProvider) -> String {
    format!("{}/{}", CLOUD_SERVICES_BASE, provider.route_segment())
}
