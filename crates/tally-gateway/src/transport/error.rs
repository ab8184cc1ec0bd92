//! HTTP mapping for `TallyError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tally_core::error::TallyError;

/// Response wrapper so handlers can return `Result<_, HttpError>` with `?`.
#[derive(Debug)]
pub struct HttpError(pub TallyError);

impl From<TallyError> for HttpError {
    fn from(e: TallyError) -> Self {
        Self(e)
    }
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            // Out-of-range counters are reported as a server error for client compatibility.
            TallyError::RangeExceeded { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            TallyError::BadRequest(_) | TallyError::UnsupportedVersion => StatusCode::BAD_REQUEST,
            TallyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.0.client_code().as_str(),
            "message": self.0.to_string(),
        }));
        (self.status(), body).into_response()
    }
}
