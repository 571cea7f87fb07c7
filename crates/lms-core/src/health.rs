use axum::http::StatusCode;

/// `GET /healthz`: the process is up.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `GET /readyz`: the service accepts traffic.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}

/// `GET /ping`, kept for clients that probe the legacy path.
pub async fn ping() -> &'static str {
    "/pong"
}
