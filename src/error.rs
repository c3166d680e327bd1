//! Error types for the prediction client.

use thiserror::Error;

/// Errors surfaced by the API client and the local file operations around it.
///
/// Field-level form validation is deliberately not part of this enum: those
/// failures are resolved locally as a field -> message map and never reach
/// the network (see `services::validation`).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request failed to complete (DNS, connect, timeout, body read).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 401 from the server. The session store is cleared before this is
    /// returned, so the caller only has to prompt for re-authentication.
    #[error("authentication failed")]
    Auth,

    /// Non-2xx response other than 401, with the server's message payload
    /// when one was present.
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("invalid payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// User-facing message for an error banner.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Auth => "Please log in to continue".to_string(),
            ApiError::Server { status: 403, .. } => {
                "You do not have permission to perform this action".to_string()
            }
            ApiError::Server { status: 404, .. } => {
                "The requested resource was not found".to_string()
            }
            ApiError::Server { status: 422, .. } => {
                "Invalid data provided. Please check your inputs".to_string()
            }
            ApiError::Server { status: 429, .. } => {
                "Too many requests. Please try again later".to_string()
            }
            ApiError::Server { status, message } => {
                if *status >= 500 {
                    "Server error. Please try again later".to_string()
                } else {
                    message.clone()
                }
            }
            ApiError::Network(e) => format!("Network error: {}", e),
            other => other.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
