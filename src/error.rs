//! Application error types with structured error handling.
//!
//! Only transport and startup failures are real errors in this system.
//! Everything the core does on page content (rewriting, sanitizing,
//! materializing) degrades instead of failing, so these variants mostly
//! describe what went wrong talking to Confluence or the filesystem.

use std::fmt;
use thiserror::Error;

/// Confluence failure classes derived from the HTTP status.
///
/// The REST API reports errors as `{"statusCode": .., "message": ..}`
/// without a stable machine-readable code, so the status is the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfluenceErrorCode {
    /// Credentials were rejected
    Unauthorized,
    /// Credentials are valid but lack permission for this content
    Forbidden,
    /// The content does not exist or is not visible to this account
    NotFound,
    /// API rate limit exceeded
    RateLimited,
    /// Confluence internal error or temporary outage
    ServerError(u16),
    /// Any other non-success status
    HttpStatus(u16),
}

impl ConfluenceErrorCode {
    /// Classifies an HTTP status code.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError(status),
            other => Self::HttpStatus(other),
        }
    }

    /// Whether this error is transient and worth retrying later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::ServerError(_))
    }

    /// Whether this error means the resource simply doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl fmt::Display for ConfluenceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::NotFound => write!(f, "not_found"),
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ServerError(code) => write!(f, "server_error_{}", code),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Confluence returned an error ({code}): {message}")]
    ConfluenceService {
        code: ConfluenceErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Output delivery failed: {}", failures.join(", "))]
    DeliveryFailed { failures: Vec<String> },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Whether this failure came from talking to Confluence.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::NetworkFailure(_) | Self::ConfluenceService { .. } | Self::MalformedResponse(_)
        )
    }

    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NetworkFailure(e) => e.is_timeout() || e.is_connect(),
            Self::ConfluenceService { code, .. } => code.is_retryable(),
            _ => false,
        }
    }
}

// Allow converting from anyhow::Error, preserving the message
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError {
            message: err.to_string(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Why the markup-to-Markdown converter produced nothing.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("converter '{program}' is not available: {reason}")]
    Unavailable { program: String, reason: String },

    #[error("converter exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("converter produced invalid UTF-8 output")]
    InvalidOutput,

    #[error("converter IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(
            ConfluenceErrorCode::from_http_status(401),
            ConfluenceErrorCode::Unauthorized
        );
        assert!(ConfluenceErrorCode::from_http_status(404).is_not_found());
        assert!(ConfluenceErrorCode::from_http_status(429).is_retryable());
        assert!(ConfluenceErrorCode::from_http_status(503).is_retryable());
        assert!(!ConfluenceErrorCode::from_http_status(400).is_retryable());
        assert_eq!(ConfluenceErrorCode::from_http_status(418).to_string(), "http_418");
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::MissingConfiguration("CONFLUENCE_API_TOKEN not set".to_string());
        assert_eq!(
            err.to_string(),
            "Missing configuration: CONFLUENCE_API_TOKEN not set"
        );

        let err = AppError::from(ConversionError::Failed {
            status: "exit status: 64".to_string(),
            stderr: "bad input".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Conversion failed: converter exited with exit status: 64: bad input"
        );
        assert!(!err.is_transport());
    }

    #[test]
    fn test_service_error_is_transport() {
        let err = AppError::ConfluenceService {
            code: ConfluenceErrorCode::NotFound,
            message: "No content found with id 7".to_string(),
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert!(err.is_transport());
        assert_eq!(
            err.to_string(),
            "Confluence returned an error (not_found): No content found with id 7"
        );
    }
}
