// GET /models handler

use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;

use crate::state::AppState;

/// List every provider, model and supported task from the catalog
pub async fn list_models_handler(state: Arc<AppState>) -> Result<impl warp::Reply, Infallible> {
    tracing::debug!("GET /models");

    Ok(warp::reply::with_status(
        warp::reply::json(state.catalog.as_json()),
        StatusCode::OK,
    ))
}
