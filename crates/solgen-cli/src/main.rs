use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use solgen_core::{ParameterSchema, TimezonePolicy};
use solgen_fetch::OpenMeteoClient;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    // Observability
    solgen_obs::init("solgen-rs");

    // Config
    let cfg = solgen_config::AppConfig::load().unwrap_or_default();
    let http_bind = cfg.http_bind();

    let schema = match cfg.schema_profile().as_str() {
        "basic" => ParameterSchema::basic(),
        _ => ParameterSchema::full(),
    };
    let timezone = match cfg.timezone_mode().as_str() {
        "fixed" => TimezonePolicy::Fixed(cfg.fixed_timezone().unwrap_or_else(|| "UTC".to_string())),
        "coordinates" => TimezonePolicy::FromCoordinates,
        _ => TimezonePolicy::Auto,
    };
    let settings = solgen_cli::PipelineSettings {
        schema,
        variable: cfg.weather_variable(),
        timezone,
        default_latitude: cfg.default_latitude(),
        default_longitude: cfg.default_longitude(),
        default_area: cfg.default_area(),
    };

    let forecaster = OpenMeteoClient::new(
        cfg.provider_base_url(),
        Duration::from_secs(cfg.fetch_timeout_secs()),
    )
    .expect("forecast client");

    // Build app and state
    let (app, state) = solgen_cli::build_app(Arc::new(forecaster), settings);

    // Start HTTP server
    let addr: SocketAddr = http_bind.parse().expect("Invalid HTTP bind address");
    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind TCP listener");

    // Mark ready just before serving
    solgen_cli::set_ready(&state, true);

    tracing::info!(%addr, "HTTP server listening");
    axum::serve(listener, app).await.expect("server error");
}
