// src/bin/api_server.rs

use notion_geojson_feed::infra::telemetry;
use notion_geojson_feed::transport;
use notion_geojson_feed::{Config, FeedService};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    telemetry::init_tracing(config.log_json);

    tracing::info!(
        database_id = %config.database_id,
        polygon_property = %config.schema.polygon_property,
        network_property = %config.schema.network_property,
        leaders_property = %config.schema.leaders_property,
        "configuration loaded"
    );
    if config.max_rate_limit_retries.is_none() {
        tracing::info!("rate-limited upstream requests are retried without limit");
    }

    let feed_service = FeedService::from_config(&config)?;
    let app_state = transport::http::AppState {
        feed_service: Arc::new(feed_service),
    };

    let app = transport::http::create_router(app_state).merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()),
    );

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("feed listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://localhost:{}/swagger-ui", config.port);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}
