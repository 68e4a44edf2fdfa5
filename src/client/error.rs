// File: ./src/client/error.rs
//! Transport-level failures of an API call.
//!
//! These are distinct from validation errors, which the server reports inside
//! a well-formed reply and which never surface as `ApiError`.
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    #[error("No valid system certificates found")]
    NoCertificates,

    #[error("Could not build request: {0}")]
    Build(#[from] http::Error),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Server answered with status {0}")]
    Status(u16),

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Short label shown to the user next to the retry affordance.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Timeout(_) => "The server did not answer in time.".to_string(),
            ApiError::Status(code) => format!("The server answered with an error ({}).", code),
            ApiError::Decode(_) | ApiError::Body(_) => {
                "The server sent an unreadable answer.".to_string()
            }
            _ => "Could not reach the server.".to_string(),
        }
    }
}
