use crate::controller::{
    CloudStorageController, DownloadUrlRequest, PreSignedUrlRequest, ResponseEnvelope,
    UploadRequest,
};
use crate::error::{ErrorEnvelope, ValidatedJson};
use crate::utils::upload::extract_upload_form;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use kendra_storage::{DownloadableUrl, PreSignedUrl, StorageObjectMetadata};
use std::sync::Arc;
use utoipa::ToSchema;

/// Multipart body accepted by the upload endpoints (documentation only).
#[derive(ToSchema)]
#[allow(dead_code)]
#[schema(rename_all = "camelCase")]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    /// Object key, e.g. `static/library/drafts.png`
    file_path: Option<String>,
    /// Container/bucket, e.g. `samiksha`
    bucket_name: Option<String>,
}

async fn read_form(
    controller: &CloudStorageController,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadRequest, ErrorEnvelope> {
    match multipart {
        Ok(multipart) => extract_upload_form(multipart)
            .await
            .map_err(|e| ErrorEnvelope::from_failure(&e, controller.exposes_error_details())),
        // Not a multipart body: treat as a request without a payload
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Upload request is not multipart");
            Ok(Default::default())
        }
    }
}

/// Upload a file with the default provider
#[utoipa::path(
    post,
    path = "/cloud-services/{provider}/upload",
    tag = "cloud-services",
    params(("provider" = String, Path, description = "Provider route segment: azure, aws, gcp or local")),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded", body = ResponseEnvelope<StorageObjectMetadata>),
        (status = 400, description = "Missing file payload", body = ErrorEnvelope),
        (status = 500, description = "Storage failure", body = ErrorEnvelope)
    )
)]
#[tracing::instrument(skip_all, fields(provider = %controller.provider(), operation = "upload"))]
pub async fn upload(
    State(controller): State<Arc<CloudStorageController>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ResponseEnvelope<StorageObjectMetadata>, ErrorEnvelope> {
    let request = read_form(&controller, multipart).await?;
    controller.upload(request).await
}

/// Generate signed download URLs
#[utoipa::path(
    post,
    path = "/cloud-services/{provider}/getDownloadableUrl",
    tag = "cloud-services",
    params(("provider" = String, Path, description = "Provider route segment: azure, aws, gcp or local")),
    request_body = DownloadUrlRequest,
    responses(
        (status = 200, description = "URLs generated", body = ResponseEnvelope<Vec<DownloadableUrl>>),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 500, description = "Storage failure", body = ErrorEnvelope)
    )
)]
#[tracing::instrument(
    skip_all,
    fields(
        provider = %controller.provider(),
        count = request.file_paths.len(),
        operation = "get_downloadable_url"
    )
)]
pub async fn get_downloadable_url(
    State(controller): State<Arc<CloudStorageController>>,
    ValidatedJson(request): ValidatedJson<DownloadUrlRequest>,
) -> Result<ResponseEnvelope<Vec<DownloadableUrl>>, ErrorEnvelope> {
    controller.get_downloadable_url(request).await
}

/// Generate signed upload URLs
#[utoipa::path(
    post,
    path = "/cloud-services/{provider}/preSignedUrls",
    tag = "cloud-services",
    params(("provider" = String, Path, description = "Provider route segment: azure, aws, gcp or local")),
    request_body = PreSignedUrlRequest,
    responses(
        (status = 200, description = "URLs generated (unwrapped list)", body = Vec<PreSignedUrl>),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 500, description = "Storage failure", body = ErrorEnvelope)
    )
)]
#[tracing::instrument(
    skip_all,
    fields(
        provider = %controller.provider(),
        count = request.file_names.len(),
        operation = "pre_signed_urls"
    )
)]
pub async fn pre_signed_urls(
    State(controller): State<Arc<CloudStorageController>>,
    ValidatedJson(request): ValidatedJson<PreSignedUrlRequest>,
) -> Result<Json<Vec<PreSignedUrl>>, ErrorEnvelope> {
    controller.pre_signed_urls(request).await.map(Json)
}

/// Upload a file to an explicit path and bucket with this provider
#[utoipa::path(
    post,
    path = "/cloud-services/{provider}/uploadFile",
    tag = "cloud-services",
    params(("provider" = String, Path, description = "Provider route segment: azure, aws, gcp or local")),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded", body = ResponseEnvelope<StorageObjectMetadata>),
        (status = 400, description = "Missing file, filePath or bucketName", body = ErrorEnvelope),
        (status = 500, description = "Storage failure", body = ErrorEnvelope)
    )
)]
#[tracing::instrument(skip_all, fields(provider = %controller.provider(), operation = "upload_file"))]
pub async fn upload_file(
    State(controller): State<Arc<CloudStorageController>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ResponseEnvelope<StorageObjectMetadata>, ErrorEnvelope> {
    let request = read_form(&controller, multipart).await?;
    controller.upload_file(request).await
}
