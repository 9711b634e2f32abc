use axum::{Extension, Json, body::Bytes, http::{Method, StatusCode}, response::IntoResponse};
use serde_json::{Value as JsonValue, json};

use crate::context::CallerContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Stand-in for the downstream service: reports what the gate let through.
pub async fn forward(
    Extension(caller): Extension<CallerContext>,
    method: Method,
    body: Bytes,
) -> impl IntoResponse {
    let body = serde_json::from_slice::<JsonValue>(&body).unwrap_or(JsonValue::Null);

    Json(json!({
        "resource": caller.resource_kind(),
        "method": method.as_str(),
        "caller": caller.identity().map(|i| json!({
            "id": i.id,
            "role": i.role,
        })),
        "body": body,
    }))
}
