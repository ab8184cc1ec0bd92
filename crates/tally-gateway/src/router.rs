//! Axum router wiring.

use axum::{
    middleware,
    routing::{any, get, post},
    Router,
};
use tally_core::Op;
use tower_http::trace::TraceLayer;

use crate::{app_state::AppState, obs, ops, transport};

pub fn build_router(state: AppState) -> Router {
    let cors = transport::cors::build_cors_layer(&state.cfg().cors);

    let track = |op: Op| middleware::from_fn_with_state((state.clone(), op), obs::track::track_request);

    Router::new()
        .route("/", any(transport::http::home))
        .route("/increment", post(transport::http::increment).route_layer(track(Op::Increment)))
        .route("/decrement", post(transport::http::decrement).route_layer(track(Op::Decrement)))
        .route("/value", post(transport::http::value).route_layer(track(Op::Echo)))
        .route("/reset", get(transport::http::reset).route_layer(track(Op::Reset)))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
