// Error handling module
// Defines the error taxonomy surfaced by the request pipeline

use thiserror::Error;

/// Errors that can occur while talking to the storefront backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// Refresh token missing or rejected; the user must log in again
    #[error("Authentication expired: {0}")]
    AuthenticationExpired(String),

    /// 401 after the single refresh-and-retry was already spent
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Transport-level failure (no HTTP response)
    #[error("Network failure ({kind}): {message}")]
    NetworkFailure { kind: &'static str, message: String },

    /// 5xx from the backend
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// 4xx other than 401, body kept for field-level feedback
    #[error("Validation error: {status} - {message}")]
    ValidationError { status: u16, message: String },

    /// Client-local storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal client error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// HTTP status carried by the error, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::ServerError { status, .. } | ApiError::ValidationError { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// True when the caller has to send the user back to the login surface
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ApiError::AuthenticationExpired(_) | ApiError::Unauthorized(_)
        )
    }

    /// Map a non-success, non-401 status to the matching error
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => ApiError::Unauthorized(message),
            500..=599 => ApiError::ServerError { status, message },
            _ => ApiError::ValidationError { status, message },
        }
    }

    /// Categorize a reqwest transport error
    pub fn from_transport(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "timeout"
        } else if err.is_connect() {
            "connection_failed"
        } else if err.is_request() {
            "request_error"
        } else if err.is_body() {
            "body_error"
        } else if err.is_decode() {
            "decode_error"
        } else {
            "unknown"
        };

        ApiError::NetworkFailure {
            kind,
            message: err.to_string(),
        }
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
