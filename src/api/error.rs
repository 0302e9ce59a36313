//! Backend error mapping

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No HTTP response at all (server down, CORS rejection)
    #[error(
        "Unable to connect to the Bug Chase server. Check that it is running and CORS is configured."
    )]
    Unreachable,
    #[error("Authentication failed. Please log in again.")]
    Unauthorized,
    /// Message supplied by the server in the response body
    #[error("{0}")]
    Server(String),
    #[error("Bug Chase server error: {status} - {status_text}")]
    Status { status: u16, status_text: String },
    /// Failure before a request could be sent
    #[error("Client error: {0}")]
    Client(String),
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Map a non-success response to an error.
///
/// Status 0 means the request never reached the server. A JSON body
/// carrying a non-empty `message` wins over the generic status line.
pub fn error_for_status(status: u16, status_text: &str, body: &str) -> ApiError {
    match status {
        0 => ApiError::Unreachable,
        401 => ApiError::Unauthorized,
        _ => {
            let message = serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.trim().is_empty());
            match message {
                Some(message) => ApiError::Server(message),
                None => ApiError::Status {
                    status,
                    status_text: status_text.to_string(),
                },
            }
        }
    }
}
