use crate::transport::http::handlers::common::fetch_error_response;
use crate::transport::http::types::{ApiResponse, AppState, GEOJSON_CONTENT_TYPE, GEOJSON_DISPOSITION};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "GeoJSON FeatureCollection (application/geo+json) built from the current database contents"),
        (status = 502, description = "Upstream query failed", body = ApiResponse),
        (status = 504, description = "Upstream query timed out", body = ApiResponse)
    )
)]
pub async fn feed_handler(State(state): State<AppState>) -> Response {
    let collection = match state.feed_service.collection().await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch database records");
            return fetch_error_response(&e).into_response();
        }
    };

    let body = match serde_json::to_vec(&collection) {
        Ok(b) => b,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failure(format!("Failed to encode GeoJSON: {}", e))),
            )
                .into_response();
        }
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, GEOJSON_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, GEOJSON_DISPOSITION),
        ],
        body,
    )
        .into_response()
}
