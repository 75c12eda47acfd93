use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "kendra=debug,kendra_api=debug,kendra_storage=debug,tower_http=debug";

/// Initialize tracing: `RUST_LOG` filter (with a crate-level default) and a
/// fmt layer, emitting JSON lines when `LOG_FORMAT=json`.
pub fn init_telemetry(service_name: &str, environment: &str) -> Result<(), anyhow::Error> {
    let json = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!(
        service = %service_name,
        environment = %environment,
        json_logs = json,
        "Tracing initialized"
    );
    Ok(())
}
