//! Counter routes.
//!
//! Bodies are taken as raw bytes and decoded leniently, so requests without a
//! JSON content type (or without a body at all) still reach the transform.

use axum::{body::Bytes, extract::State, Json};
use tally_core::protocol::{decode_lenient, CounterValue};
use tally_core::Op;

use crate::app_state::AppState;
use crate::transport::error::HttpError;

pub const WELCOME: &str = "Welcome to the API! This API provides a Counter-service \
(increment & decrement a value, or return current value).";

pub async fn home() -> &'static str {
    WELCOME
}

pub async fn increment(State(state): State<AppState>, body: Bytes) -> Result<Json<CounterValue>, HttpError> {
    run(&state, Op::Increment, &body)
}

pub async fn decrement(State(state): State<AppState>, body: Bytes) -> Result<Json<CounterValue>, HttpError> {
    run(&state, Op::Decrement, &body)
}

pub async fn value(State(state): State<AppState>, body: Bytes) -> Result<Json<CounterValue>, HttpError> {
    run(&state, Op::Echo, &body)
}

/// The body is read and discarded.
pub async fn reset(State(state): State<AppState>) -> Result<Json<CounterValue>, HttpError> {
    run(&state, Op::Reset, &[])
}

fn run(state: &AppState, op: Op, body: &[u8]) -> Result<Json<CounterValue>, HttpError> {
    let input = decode_lenient(body);
    let res = op.apply(input.value);

    let outcome = match &res {
        Ok(out) => {
            tracing::debug!(op = op.as_str(), input = input.value, output = out, "counter transformed");
            "ok"
        }
        Err(e) => {
            tracing::warn!(op = op.as_str(), value = input.value, error = %e, "counter rejected");
            e.client_code().as_str()
        }
    };
    state
        .metrics()
        .requests
        .inc(&[("op", op.as_str()), ("outcome", outcome)]);

    Ok(Json(CounterValue::new(res?)))
}
