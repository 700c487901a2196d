use notion_geojson_feed::domain::transform::normalize_record;
use notion_geojson_feed::infra::telemetry;
use notion_geojson_feed::{Config, NotionClient};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Requires env vars:\n\
           NOTION_TOKEN, NOTION_DATABASE_ID\n\
         Optional:\n\
           NOTION_PROP_NETWORK_NAME, NOTION_PROP_POLYGON, NOTION_PROP_LEADERS,\n\
           NOTION_API_BASE, NOTION_VERSION, PORT\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let config = Config::from_env()?;
    telemetry::init_tracing(config.log_json);
    tracing::info!(query_url = %config.query_url(), notion_version = %config.notion_version, "preflight");

    let client = NotionClient::new(&config)?;
    let page = client
        .probe()
        .await
        .map_err(|e| anyhow::anyhow!("Query against {} failed: {}", config.query_url(), e))?;
    tracing::info!("query endpoint reachable and token accepted");

    let Some(record) = page.results.first() else {
        tracing::warn!("database returned no records; property names cannot be checked");
        return Ok(());
    };

    let schema = &config.schema;
    for name in [
        &schema.polygon_property,
        &schema.network_property,
        &schema.leaders_property,
    ] {
        if record.has_property(name) {
            tracing::info!(property = %name, "property found");
        } else {
            tracing::warn!(property = %name, "property not found on first record");
        }
    }

    match normalize_record(record, schema) {
        Ok(feature) => tracing::info!(
            record_id = %record.id,
            geometry_type = feature.geometry.kind().unwrap_or("?"),
            "first record normalizes cleanly"
        ),
        Err(reason) => tracing::warn!(record_id = %record.id, %reason, "first record would be skipped"),
    }

    Ok(())
}
