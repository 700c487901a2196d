use crate::transport::http::handlers::{feed, health};
use crate::transport::http::types::{ApiResponse, AppState, HealthResponse};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(feed::feed_handler, health::healthcheck_handler),
    components(schemas(ApiResponse, HealthResponse))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    Router::new()
        .route("/", get(feed::feed_handler))
        .route("/health", get(health::healthcheck_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
