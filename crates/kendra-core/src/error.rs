//! Error types module
//!
//! `AppError` covers failures raised by the service itself (bad input, broken
//! configuration). Storage failures live in `kendra-storage`; both sides
//! describe how they should be rendered through `ErrorMetadata`.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Describes how an error is presented to HTTP clients.
///
/// `http_status_code` and `client_message` return `None` when the error has
/// nothing meaningful to expose; callers fall back to the
/// `HttpStatus::InternalServerError` catalog entry.
pub trait ErrorMetadata {
    /// HTTP status code carried by the error, if any
    fn http_status_code(&self) -> Option<u16>;

    /// Client-facing message, if the error exposes one
    fn client_message(&self) -> Option<String>;

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;

    /// Full message for logs and non-production error bodies
    fn detailed_message(&self) -> String;

    /// Short error type name
    fn error_type(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> Option<u16> {
        match self {
            AppError::InvalidInput(_) => Some(400),
            AppError::Config(_) => Some(500),
        }
    }

    fn client_message(&self) -> Option<String> {
        match self {
            AppError::InvalidInput(msg) => Some(msg.clone()),
            AppError::Config(_) => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Config(_) => "CONFIGURATION_ERROR",
        }
    }

    fn is_sensitive(&self) -> bool {
        matches!(self, AppError::Config(_))
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidInput(_) => LogLevel::Debug,
            AppError::Config(_) => LogLevel::Error,
        }
    }

    fn detailed_message(&self) -> String {
        self.to_string()
    }

    fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Config(_) => "Config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_expose_message() {
        let err = AppError::InvalidInput("filePaths must be an array".to_string());
        assert_eq!(err.http_status_code(), Some(400));
        assert_eq!(
            err.client_message().as_deref(),
            Some("filePaths must be an array")
        );
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_config_errors_hide_message() {
        let err = AppError::Config("AZURE_ACCOUNT_KEY is not valid base64".to_string());
        assert_eq!(err.http_status_code(), Some(500));
        assert_eq!(err.client_message(), None);
        assert!(err.is_sensitive());
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        assert!(err.detailed_message().contains("AZURE_ACCOUNT_KEY"));
    }
}
