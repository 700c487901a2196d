use crate::transport::http::types::HealthResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Process is up", body = HealthResponse)
    )
)]
pub async fn healthcheck_handler() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}
