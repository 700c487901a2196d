use crate::infra::notion::FetchError;
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::Json;

/// Maps an upstream failure to the response sent to our own caller.
pub fn fetch_error_response(err: &FetchError) -> (StatusCode, Json<ApiResponse>) {
    let status = if err.is_timeout() {
        StatusCode::GATEWAY_TIMEOUT
    } else {
        StatusCode::BAD_GATEWAY
    };
    (
        status,
        Json(ApiResponse::failure(format!("Upstream query failed: {}", err))),
    )
}
