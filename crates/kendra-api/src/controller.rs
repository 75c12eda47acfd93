//! Cloud storage controller
//!
//! `CloudStorageController` turns HTTP-shaped requests into `FilesHelper`
//! calls for one provider tag and normalizes the outcome. Each operation is a
//! single validate, delegate, map sequence: exactly one envelope comes back,
//! either a success value or an `ErrorEnvelope`.
//!
//! Success shapes differ per operation and clients depend on them:
//!
//! | operation            | success body                         |
//! |----------------------|--------------------------------------|
//! | `upload`             | `{ status, message, result }`        |
//! | `getDownloadableUrl` | `{ status, message, result }`        |
//! | `preSignedUrls`      | helper result, unwrapped             |
//! | `uploadFile`         | `{ status, result }`                 |

use crate::error::ErrorEnvelope;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use kendra_core::{ApiMessages, HttpStatus};
use kendra_storage::{
    CloudProvider, DownloadableUrl, FilesHelper, PreSignedUrl, StorageError,
    StorageObjectMetadata,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Values injected into a controller at construction.
#[derive(Debug, Clone)]
pub struct ControllerContext {
    /// Provider tag passed to the helper for provider-scoped operations
    pub provider: CloudProvider,
    pub messages: ApiMessages,
    /// Include error details in failure envelopes (non-production only)
    pub expose_error_details: bool,
}

impl ControllerContext {
    pub fn new(provider: CloudProvider) -> Self {
        Self {
            provider,
            messages: ApiMessages::default(),
            expose_error_details: false,
        }
    }

    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.expose_error_details = expose;
        self
    }
}

/// Fields extracted from an upload form.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub file_data: Option<Bytes>,
    pub file_path: Option<String>,
    pub bucket_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DownloadUrlRequest {
    pub file_paths: Vec<String>,
    pub bucket_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PreSignedUrlRequest {
    pub file_names: Vec<String>,
    pub bucket: Option<String>,
}

/// Success envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResponseEnvelope<T> {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub result: T,
}

impl<T> ResponseEnvelope<T> {
    fn ok(message: Option<String>, result: T) -> Self {
        Self {
            status: HttpStatus::Ok.status(),
            message,
            result,
        }
    }
}

impl<T: Serialize> IntoResponse for ResponseEnvelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub struct CloudStorageController {
    files: Arc<FilesHelper>,
    context: ControllerContext,
}

impl CloudStorageController {
    pub fn new(files: Arc<FilesHelper>, context: ControllerContext) -> Self {
        Self { files, context }
    }

    pub fn provider(&self) -> CloudProvider {
        self.context.provider
    }

    pub fn exposes_error_details(&self) -> bool {
        self.context.expose_error_details
    }

    fn reject(&self, error: StorageError) -> ErrorEnvelope {
        ErrorEnvelope::from_failure(&error, self.context.expose_error_details)
    }

    /// Upload a file. Path, bucket and provider fall back to the helper's
    /// defaults.
    pub async fn upload(
        &self,
        request: UploadRequest,
    ) -> Result<ResponseEnvelope<StorageObjectMetadata>, ErrorEnvelope> {
        let Some(data) = request.file_data.filter(|d| !d.is_empty()) else {
            return Err(ErrorEnvelope::bad_request());
        };

        let file_path = present(request.file_path);
        let bucket_name = present(request.bucket_name);

        let result = self
            .files
            .upload(data, file_path.as_deref(), bucket_name.as_deref(), None)
            .await
            .map_err(|e| self.reject(e))?;

        Ok(ResponseEnvelope::ok(
            Some(self.context.messages.file_uploaded.clone()),
            result,
        ))
    }

    /// Signed read URLs for the requested paths.
    pub async fn get_downloadable_url(
        &self,
        request: DownloadUrlRequest,
    ) -> Result<ResponseEnvelope<Vec<DownloadableUrl>>, ErrorEnvelope> {
        let bucket_name = present(request.bucket_name);

        let result = self
            .files
            .get_downloadable_url(
                &request.file_paths,
                bucket_name.as_deref(),
                Some(self.context.provider),
            )
            .await
            .map_err(|e| self.reject(e))?;

        Ok(ResponseEnvelope::ok(
            Some(self.context.messages.cloud_service_success.clone()),
            result,
        ))
    }

    /// Signed upload URLs for the requested file names, returned unwrapped.
    pub async fn pre_signed_urls(
        &self,
        request: PreSignedUrlRequest,
    ) -> Result<Vec<PreSignedUrl>, ErrorEnvelope> {
        let bucket = present(request.bucket);

        self.files
            .pre_signed_urls(
                &request.file_names,
                bucket.as_deref(),
                Some(self.context.provider),
            )
            .await
            .map_err(|e| self.reject(e))
    }

    /// Upload a file to an explicit path and bucket with this controller's
    /// provider. All three fields are required.
    pub async fn upload_file(
        &self,
        request: UploadRequest,
    ) -> Result<ResponseEnvelope<StorageObjectMetadata>, ErrorEnvelope> {
        let (Some(data), Some(file_path), Some(bucket_name)) = (
            request.file_data.filter(|d| !d.is_empty()),
            present(request.file_path),
            present(request.bucket_name),
        ) else {
            return Err(ErrorEnvelope::bad_request());
        };

        let result = self
            .files
            .upload(
                data,
                Some(&file_path),
                Some(&bucket_name),
                Some(self.context.provider),
            )
            .await
            .map_err(|e| self.reject(e))?;

        Ok(ResponseEnvelope::ok(None, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kendra_storage::LocalStorage;
    use tempfile::TempDir;

    async fn controller(provider: CloudProvider) -> (CloudStorageController, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalStorage::new(
            dir.path(),
            "http://localhost:4000/local-files".to_string(),
            Some("controller-test".to_string()),
        )
        .await
        .unwrap();
        let files = FilesHelper::new(CloudProvider::Local).with_backend(Arc::new(local));
        let controller = CloudStorageController::new(
            Arc::new(files),
            ControllerContext::new(provider).with_error_details(true),
        );
        (controller, dir)
    }

    fn form(data: Option<&'static [u8]>, path: Option<&str>, bucket: Option<&str>) -> UploadRequest {
        UploadRequest {
            file_data: data.map(Bytes::from_static),
            file_path: path.map(String::from),
            bucket_name: bucket.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_upload_without_payload_is_bad_request() {
        let (controller, _dir) = controller(CloudProvider::Local).await;
        let err = controller
            .upload(form(None, Some("static/library/drafts.png"), Some("samiksha")))
            .await
            .unwrap_err();
        assert_eq!(err, ErrorEnvelope::bad_request());
    }

    #[tokio::test]
    async fn test_upload_wraps_with_message() {
        let (controller, _dir) = controller(CloudProvider::Local).await;
        let envelope = controller
            .upload(form(
                Some(b"png-bytes"),
                Some("static/library/drafts.png"),
                Some("samiksha"),
            ))
            .await
            .unwrap();
        assert_eq!(envelope.status, 200);
        assert_eq!(envelope.message.as_deref(), Some("file uploaded successfully"));
        assert_eq!(envelope.result.name, "static/library/drafts.png");
        assert_eq!(envelope.result.container_name, "samiksha");
    }

    #[tokio::test]
    async fn test_upload_file_requires_every_field() {
        let (controller, _dir) = controller(CloudProvider::Local).await;
        for request in [
            form(None, Some("a.png"), Some("samiksha")),
            form(Some(b"x"), None, Some("samiksha")),
            form(Some(b"x"), Some("a.png"), None),
            form(Some(b"x"), Some(""), Some("samiksha")),
        ] {
            let err = controller.upload_file(request).await.unwrap_err();
            assert_eq!(err.status, 400);
            assert_eq!(err.message, "bad request");
        }
    }

    #[tokio::test]
    async fn test_upload_file_has_no_message() {
        let (controller, _dir) = controller(CloudProvider::Local).await;
        let envelope = controller
            .upload_file(form(Some(b"csv"), Some("1230981723091723/sample.csv"), Some("samiksha")))
            .await
            .unwrap();
        assert_eq!(envelope.message, None);
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json.get("message").is_none());
        assert_eq!(json["result"]["cloudStorage"], "LOCAL");
    }

    #[tokio::test]
    async fn test_provider_scoped_failure_defaults_to_500() {
        // Controller for Azure over a helper that only has the local backend
        let (controller, _dir) = controller(CloudProvider::Azure).await;
        let err = controller
            .get_downloadable_url(DownloadUrlRequest {
                file_paths: vec!["a.png".to_string()],
                bucket_name: Some("samiksha".to_string()),
            })
            .await
            .unwrap_err();
        assert_eq!(err.status, 500);
        assert_eq!(err.message, "Cloud storage provider AZURE is not configured");
        assert_eq!(err.error_object.unwrap().code, "PROVIDER_NOT_CONFIGURED");
    }
}
