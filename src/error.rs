//! Error types for the HTTP layer and startup

use thiserror::Error;
use warp::http::StatusCode;
use warp::Reply;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::models::ErrorResponse;
use crate::providers::ImageError;

pub const MISSING_PARAMETERS: &str = "Missing required parameters: provider, model, task, prompt";
pub const INVALID_TASK: &str = "Invalid task type. Use 'text_to_image' or 'image_to_image'.";
pub const MISSING_IMAGE: &str = "Missing 'image' file for image-to-image task.";
pub const EMPTY_IMAGE_FILENAME: &str = "No selected file for 'image'.";

/// Errors reported to API callers as `{"error": message}`
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request is malformed or not allowed by the catalog
    #[error("{0}")]
    BadRequest(String),

    /// The catalog lists a provider that has no client
    #[error("Provider '{0}' is not implemented.")]
    NotImplemented(String),

    /// The provider call failed
    #[error("Image generation failed: {0}")]
    GenerationFailed(#[from] ImageError),

    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Payload too large: upload exceeds {0} bytes")]
    PayloadTooLarge(u64),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotImplemented(_) | ApiError::GenerationFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    pub fn into_response(self) -> warp::reply::Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        warp::reply::with_status(warp::reply::json(&body), self.status()).into_response()
    }
}

/// Failures that stop the process before it starts serving
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Failed to initialise providers: {0}")]
    Providers(#[from] ImageError),
}
