//! HTTP error envelope
//!
//! Every failure leaves the API as an `ErrorEnvelope`:
//! `{ status, message, errorObject }`. Envelopes are built either from the
//! fixed `HttpStatus` catalog (missing required fields) or from any error that
//! implements `ErrorMetadata`, falling back to 500 / "internal server error"
//! when the error carries no status or message of its own.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kendra_core::{AppError, ErrorMetadata, HttpStatus, LogLevel};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;

/// Machine-readable detail attached to failures raised by the storage helper
/// or request parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorObject {
    /// Error code for programmatic handling (e.g. "UPLOAD_FAILED")
    pub code: String,
    /// Full error text; omitted in production and for sensitive errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_object: Option<ErrorObject>,
}

impl ErrorEnvelope {
    /// Envelope for a catalog entry, without an error object.
    pub fn from_status(status: HttpStatus) -> Self {
        Self {
            status: status.status(),
            message: status.message().to_string(),
            error_object: None,
        }
    }

    /// 400 / "bad request"
    pub fn bad_request() -> Self {
        Self::from_status(HttpStatus::BadRequest)
    }

    /// Normalize a failure. Status and message come from the error when it
    /// exposes them, otherwise from the internal-server-error catalog entry.
    pub fn from_failure(error: &dyn ErrorMetadata, expose_details: bool) -> Self {
        log_error(error);

        let fallback = HttpStatus::InternalServerError;
        let status = error
            .http_status_code()
            .filter(|code| StatusCode::from_u16(*code).is_ok())
            .unwrap_or(fallback.status());
        let message = error
            .client_message()
            .unwrap_or_else(|| fallback.message().to_string());

        let details = (expose_details && !error.is_sensitive()).then(|| error.detailed_message());

        Self {
            status,
            message,
            error_object: Some(ErrorObject {
                code: error.error_code().to_string(),
                details,
            }),
        }
    }
}

fn log_error(error: &dyn ErrorMetadata) {
    let error_type = error.error_type();
    let detail = error.detailed_message();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %detail, error_type = error_type, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %detail, error_type = error_type, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %detail, error_type = error_type, "Request failed");
        }
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Convert JSON body deserialization failures into a 400 envelope.
impl From<JsonRejection> for ErrorEnvelope {
    fn from(rejection: JsonRejection) -> Self {
        let error =
            AppError::InvalidInput(format!("Invalid request body: {}", rejection.body_text()));
        ErrorEnvelope::from_failure(&error, false)
    }
}

/// JSON body extractor that answers with an `ErrorEnvelope` (400) on
/// deserialization failure instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ErrorEnvelope;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(ErrorEnvelope::from)?;
        Ok(ValidatedJson(inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kendra_storage::{CloudProvider, StorageError};

    #[test]
    fn test_bad_request_has_no_error_object() {
        let envelope = ErrorEnvelope::bad_request();
        assert_eq!(envelope.status, 400);
        assert_eq!(envelope.message, "bad request");
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json.get("errorObject").is_none());
    }

    #[test]
    fn test_failure_without_status_defaults_to_500() {
        let err = StorageError::UploadFailed("connection reset by peer".to_string());
        let envelope = ErrorEnvelope::from_failure(&err, true);
        assert_eq!(envelope.status, 500);
        assert_eq!(envelope.message, "Upload failed: connection reset by peer");
        assert_eq!(envelope.error_object.unwrap().code, "UPLOAD_FAILED");
    }

    #[test]
    fn test_failure_without_message_defaults_to_catalog() {
        let err = StorageError::ConfigError("bad key".to_string());
        let envelope = ErrorEnvelope::from_failure(&err, true);
        assert_eq!(envelope.status, 500);
        assert_eq!(envelope.message, "internal server error");
        // sensitive errors never expose details
        assert_eq!(envelope.error_object.unwrap().details, None);
    }

    #[test]
    fn test_failure_status_and_message_pass_through() {
        let err = StorageError::NotFound("samiksha/a.png".to_string());
        let envelope = ErrorEnvelope::from_failure(&err, false);
        assert_eq!(envelope.status, 404);
        assert_eq!(envelope.message, "File not found: samiksha/a.png");
        assert_eq!(envelope.error_object.unwrap().details, None);

        let err = StorageError::ProviderNotConfigured(CloudProvider::Gc);
        let envelope = ErrorEnvelope::from_failure(&err, true);
        assert_eq!(envelope.status, 500);
        assert_eq!(envelope.message, "Cloud storage provider GC is not configured");
    }

    #[test]
    fn test_envelope_serializes_camel_case() {
        let err = AppError::InvalidInput("filePaths must be an array".to_string());
        let envelope = ErrorEnvelope::from_failure(&err, true);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["status"], 400);
        assert_eq!(json["errorObject"]["code"], "INVALID_INPUT");
        assert_eq!(
            json["errorObject"]["details"],
            "Invalid input: filePaths must be an array"
        );
    }
}
