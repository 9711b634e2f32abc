use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use bazaar_auth::Rejection;

/// Uniform rejection: fixed status and `{"message": ...}` body, no detail.
pub fn rejection_response(rejection: Rejection) -> Response {
    let status = StatusCode::from_u16(rejection.status()).unwrap_or(StatusCode::FORBIDDEN);
    (status, Json(rejection.body())).into_response()
}
