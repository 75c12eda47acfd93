//! Multipart parsing for the upload endpoints

use crate::controller::UploadRequest;
use axum::extract::Multipart;
use kendra_core::AppError;

/// Form field carrying the file payload.
pub const FILE_FIELD: &str = "file";
pub const FILE_PATH_FIELD: &str = "filePath";
pub const BUCKET_NAME_FIELD: &str = "bucketName";

/// Extract the file payload, `filePath` and `bucketName` from a multipart form.
///
/// Only one field named "file" is accepted; multiple file fields are rejected.
/// Unknown fields are ignored. A form without a file yields a request with no
/// payload so the controller can answer with its own bad-request envelope.
pub async fn extract_upload_form(mut multipart: Multipart) -> Result<UploadRequest, AppError> {
    let mut request = UploadRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            FILE_FIELD => {
                if request.file_data.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;
                request.file_data = Some(data);
            }
            FILE_PATH_FIELD => {
                request.file_path = Some(read_text(field, FILE_PATH_FIELD).await?);
            }
            BUCKET_NAME_FIELD => {
                request.bucket_name = Some(read_text(field, BUCKET_NAME_FIELD).await?);
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(request)
}

async fn read_text(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read {}: {}", name, e)))
}
