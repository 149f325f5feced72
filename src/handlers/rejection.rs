// Rejection recovery: every failed route answers with a JSON error body

use std::convert::Infallible;
use warp::reject::MethodNotAllowed;
use warp::Rejection;

use crate::error::ApiError;

pub async fn handle_rejection(err: Rejection) -> Result<warp::reply::Response, Infallible> {
    let error = if err.is_not_found() {
        ApiError::NotFound
    } else if err.find::<MethodNotAllowed>().is_some() {
        ApiError::MethodNotAllowed
    } else {
        tracing::debug!(rejection = ?err, "Request rejected");
        ApiError::BadRequest("Invalid request: expected a multipart/form-data body.".to_string())
    };

    Ok(error.into_response())
}
