//! Uniform JSON error envelope.
//!
//! Every service error renders through [`error_response`] so clients see one
//! shape: `{ "success": false, "kind": …, "message": …, "error"?: … }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Build the JSON error response.
///
/// `detail` carries the internal cause; it is only emitted in debug builds.
pub fn error_response(
    status: StatusCode,
    kind: &str,
    message: &str,
    detail: Option<String>,
) -> Response {
    let mut body = serde_json::json!({
        "success": false,
        "kind": kind,
        "message": message,
    });
    if cfg!(debug_assertions) {
        if let Some(detail) = detail {
            body["error"] = serde_json::Value::String(detail);
        }
    }
    (status, axum::Json(body)).into_response()
}

/// Fallback for unknown routes: 404 with an empty body.
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
