//! Response catalogs
//!
//! `HttpStatus` is the fixed table of `{status, message}` pairs used for
//! envelopes that are not produced from a concrete error value. `ApiMessages`
//! holds the success messages controllers attach to their envelopes.

/// Fixed `{status, message}` catalog keyed by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatus {
    Ok,
    BadRequest,
    NotFound,
    InternalServerError,
}

impl HttpStatus {
    pub const fn status(self) -> u16 {
        match self {
            HttpStatus::Ok => 200,
            HttpStatus::BadRequest => 400,
            HttpStatus::NotFound => 404,
            HttpStatus::InternalServerError => 500,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            HttpStatus::Ok => "ok",
            HttpStatus::BadRequest => "bad request",
            HttpStatus::NotFound => "not found",
            HttpStatus::InternalServerError => "internal server error",
        }
    }
}

/// Message returned by `upload` on success.
pub const FILE_UPLOADED: &str = "file uploaded successfully";

/// Message returned by `getDownloadableUrl` on success.
pub const CLOUD_SERVICE_SUCCESS_MESSAGE: &str = "url's generated successfully";

/// Success messages injected into controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiMessages {
    pub file_uploaded: String,
    pub cloud_service_success: String,
}

impl Default for ApiMessages {
    fn default() -> Self {
        Self {
            file_uploaded: FILE_UPLOADED.to_string(),
            cloud_service_success: CLOUD_SERVICE_SUCCESS_MESSAGE.to_string(),
        }
    }
}
