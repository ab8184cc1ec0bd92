//! Per-route request tracking: in-flight gauge and latency histogram.
//!
//! Wraps body read, handler and response construction, so a request that is
//! still streaming its body counts as in flight.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tally_core::Op;

use crate::app_state::AppState;

pub async fn track_request(State((state, op)): State<(AppState, Op)>, req: Request, next: Next) -> Response {
    let _in_flight = InFlight::enter(&state, op);
    let started = Instant::now();

    let resp = next.run(req).await;

    state
        .metrics()
        .request_duration
        .observe(&[("op", op.as_str())], started.elapsed());
    resp
}

/// Decrements the gauge on drop, including when the request future is aborted.
struct InFlight {
    state: AppState,
    op: Op,
}

impl InFlight {
    fn enter(state: &AppState, op: Op) -> Self {
        state.metrics().in_flight.inc(&[("op", op.as_str())]);
        Self { state: state.clone(), op }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.state.metrics().in_flight.dec(&[("op", self.op.as_str())]);
    }
}
