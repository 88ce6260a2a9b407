pub mod page;
pub mod relay;

use axum::http::StatusCode;

/// Every path/method combination without a route.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
