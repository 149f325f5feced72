//! Error types for the provider layer

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling an image provider
#[derive(Debug, Error)]
pub enum ImageError {
    /// HTTP request failures, including non-2xx provider responses
    #[error("HTTP error (status {status}): {body}")]
    HttpError { status: u16, body: String },

    /// JSON encoding/decoding issues
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Provider returned a well-formed error payload
    #[error("Provider error ({code}): {message}")]
    ProviderError { code: String, message: String },

    /// The provider has no implementation for the requested task
    #[error("{0}")]
    Unsupported(String),

    /// An asynchronous provider task finished unsuccessfully
    #[error("Task {task_id} failed: {message}")]
    TaskFailed { task_id: String, message: String },

    /// An asynchronous provider task did not finish in time
    #[error("Task {task_id} did not complete within {} seconds.", .timeout.as_secs())]
    Timeout { task_id: String, timeout: Duration },
}

impl From<serde_json::Error> for ImageError {
    fn from(err: serde_json::Error) -> Self {
        ImageError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for ImageError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ImageError::HttpError {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ImageError::HttpError {
                status: 0,
                body: err.to_string(),
            }
        }
    }
}

impl From<base64::DecodeError> for ImageError {
    fn from(err: base64::DecodeError) -> Self {
        ImageError::SerializationError(format!("Invalid base64 image: {}", err))
    }
}
