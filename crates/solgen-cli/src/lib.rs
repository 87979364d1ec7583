use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Duration, Local, NaiveDate};
use opentelemetry::metrics::{Counter, MeterProvider};
use opentelemetry_prometheus::exporter;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::{Encoder, Registry, TextEncoder};
use serde_json::json;

use solgen_core::{
    build_query, cumulative_energy, daily_profiles, daily_totals, derive_series, validate,
    DerivedSeries, FetchError, ForecastProvider, Outcome, ParameterSchema, RawParameters,
    TimezonePolicy, TypedParameters, ValidationError, FORECAST_HORIZON_DAYS,
};

/// Per-deployment pipeline settings, resolved from configuration at startup
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub schema: ParameterSchema,
    pub variable: String,
    pub timezone: TimezonePolicy,
    pub default_latitude: f64,
    pub default_longitude: f64,
    pub default_area: f64,
}

pub struct AppState {
    ready: AtomicBool,
    registry: Registry,
    #[allow(dead_code)]
    provider: SdkMeterProvider,
    requests_total: Counter<u64>,
    forecaster: Arc<dyn ForecastProvider>,
    settings: PipelineSettings,
}

pub fn build_app(
    forecaster: Arc<dyn ForecastProvider>,
    settings: PipelineSettings,
) -> (Router, Arc<AppState>) {
    // Prometheus exporter via OpenTelemetry
    let registry = Registry::new();
    let reader = exporter()
        .with_registry(registry.clone())
        .build()
        .expect("prom exporter");
    let provider = SdkMeterProvider::builder().with_reader(reader).build();
    let meter = provider.meter("solgen-cli");

    let requests_total = meter
        .u64_counter("solgen_requests_total")
        .with_description("Total HTTP requests served")
        .init();

    let state = Arc::new(AppState {
        ready: AtomicBool::new(false),
        registry,
        provider,
        requests_total,
        forecaster,
        settings,
    });

    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/v1/forecast", get(forecast_table))
        .route("/api/v1/forecast.csv", get(forecast_csv))
        .route("/api/v1/forecast/metadata.csv", get(forecast_metadata_csv))
        .route("/api/v1/charts/cumulative", get(chart_cumulative))
        .route("/api/v1/charts/daily-overlay", get(chart_daily_overlay))
        .route("/api/v1/charts/daily-totals", get(chart_daily_totals))
        .with_state(Arc::clone(&state));

    (router, state)
}

pub fn set_ready(state: &Arc<AppState>, is_ready: bool) {
    state.ready.store(is_ready, Ordering::Relaxed);
}

async fn healthz(State(state): State<Arc<AppState>>) -> StatusCode {
    state.requests_total.add(1, &[]);
    StatusCode::OK
}

async fn readyz(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.ready.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn metrics(
    State(state): State<Arc<AppState>>,
) -> (
    [(axum::http::header::HeaderName, axum::http::HeaderValue); 1],
    String,
) {
    let encoder = TextEncoder::new();
    let metric_families = state.registry.gather();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buf) {
        tracing::warn!(error=?e, "failed to encode metrics");
    }
    let body = String::from_utf8(buf).unwrap_or_default();
    let header = (
        header::CONTENT_TYPE,
        axum::http::HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    ([header], body)
}

/// One render of the pipeline: validate, fetch, transform. Each call owns
/// its parameter set, query, and series end to end.
enum Render {
    /// No parameters supplied: respond with the interactive defaults
    Interactive(serde_json::Value),
    Rows(TypedParameters, DerivedSeries),
}

enum RenderFailure {
    Invalid(Vec<ValidationError>),
    Fetch(FetchError),
}

impl RenderFailure {
    fn into_response(self) -> Response {
        match self {
            RenderFailure::Invalid(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": errors })),
            )
                .into_response(),
            RenderFailure::Fetch(err) => {
                let status = match err {
                    FetchError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                    _ => StatusCode::BAD_GATEWAY,
                };
                tracing::warn!(error = %err, "forecast fetch failed");
                (status, Json(json!({ "error": err.to_string() }))).into_response()
            }
        }
    }
}

async fn render(state: &AppState, raw: &RawParameters) -> Result<Render, RenderFailure> {
    let today = Local::now().date_naive();
    match validate(raw, &state.settings.schema, today) {
        Ok(Outcome::NoParams) => Ok(Render::Interactive(interactive_defaults(
            &state.settings,
            today,
        ))),
        Ok(Outcome::Params(params)) => {
            let query = build_query(&params, &state.settings.variable, &state.settings.timezone);
            let raw_series = state
                .forecaster
                .fetch_hourly(&query)
                .await
                .map_err(RenderFailure::Fetch)?;
            let series = derive_series(&raw_series, params.area);
            Ok(Render::Rows(params, series))
        }
        Err(errors) => Err(RenderFailure::Invalid(errors)),
    }
}

fn interactive_defaults(settings: &PipelineSettings, today: NaiveDate) -> serde_json::Value {
    json!({
        "mode": "interactive",
        "defaults": {
            "latitude": settings.default_latitude,
            "longitude": settings.default_longitude,
            "area": settings.default_area,
            "start_date": today.to_string(),
            "end_date": (today + Duration::days(FORECAST_HORIZON_DAYS - 1)).to_string(),
        }
    })
}

async fn forecast_table(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.requests_total.add(1, &[]);
    match render(&state, &raw).await {
        Ok(Render::Interactive(body)) => (StatusCode::OK, Json(body)).into_response(),
        Ok(Render::Rows(params, series)) => (
            StatusCode::OK,
            Json(json!({
                "params": params,
                "variable": state.settings.variable,
                "rows": series,
            })),
        )
            .into_response(),
        Err(failure) => failure.into_response(),
    }
}

async fn forecast_csv(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.requests_total.add(1, &[]);
    match render(&state, &raw).await {
        Ok(Render::Interactive(body)) => (StatusCode::OK, Json(body)).into_response(),
        Ok(Render::Rows(_, series)) => {
            match solgen_export::series_csv(&series, &state.settings.variable) {
                Ok(bytes) => csv_download("attachment; filename=\"solar_forecast.csv\"", bytes),
                Err(e) => {
                    tracing::error!(error=?e, "csv render failed");
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            }
        }
        Err(failure) => failure.into_response(),
    }
}

async fn forecast_metadata_csv(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.requests_total.add(1, &[]);
    match render(&state, &raw).await {
        Ok(Render::Interactive(body)) => (StatusCode::OK, Json(body)).into_response(),
        Ok(Render::Rows(params, _)) => {
            match solgen_export::metadata_csv(&params, &state.settings.variable) {
                Ok(bytes) => csv_download(
                    "attachment; filename=\"solar_forecast_metadata.csv\"",
                    bytes,
                ),
                Err(e) => {
                    tracing::error!(error=?e, "metadata csv render failed");
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            }
        }
        Err(failure) => failure.into_response(),
    }
}

fn csv_download(disposition: &'static str, bytes: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_static(disposition),
            ),
        ],
        bytes,
    )
        .into_response()
}

async fn chart_cumulative(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.requests_total.add(1, &[]);
    match render(&state, &raw).await {
        Ok(Render::Interactive(body)) => (StatusCode::OK, Json(body)).into_response(),
        Ok(Render::Rows(_, series)) => (
            StatusCode::OK,
            Json(json!({ "points": cumulative_energy(&series) })),
        )
            .into_response(),
        Err(failure) => failure.into_response(),
    }
}

async fn chart_daily_overlay(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.requests_total.add(1, &[]);
    match render(&state, &raw).await {
        Ok(Render::Interactive(body)) => (StatusCode::OK, Json(body)).into_response(),
        Ok(Render::Rows(_, series)) => (
            StatusCode::OK,
            Json(json!({ "days": daily_profiles(&series) })),
        )
            .into_response(),
        Err(failure) => failure.into_response(),
    }
}

async fn chart_daily_totals(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.requests_total.add(1, &[]);
    match render(&state, &raw).await {
        Ok(Render::Interactive(body)) => (StatusCode::OK, Json(body)).into_response(),
        Ok(Render::Rows(_, series)) => (
            StatusCode::OK,
            Json(json!({ "days": daily_totals(&series) })),
        )
            .into_response(),
        Err(failure) => failure.into_response(),
    }
}
