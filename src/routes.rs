// Route definitions and handlers

use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

use crate::handlers;
use crate::state::AppState;

pub fn configure_routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    // POST /generate; the upload limit is enforced while reading parts
    let generate = warp::path("generate")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::multipart::form().max_length(None))
        .and(with_state(state.clone()))
        .and_then(handlers::generate_handler);

    // GET /models
    let list_models = warp::path("models")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state))
        .and_then(handlers::list_models_handler);

    // Combine routes
    generate
        .or(list_models)
        .recover(handlers::handle_rejection)
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}
