use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use solgen_core::{
    FetchError, ForecastProvider, ForecastQuery, ParameterSchema, RawSeries, TimezonePolicy,
};
use solgen_cli::PipelineSettings;
use tower::ServiceExt;

struct EmptyProvider;

#[async_trait::async_trait]
impl ForecastProvider for EmptyProvider {
    async fn fetch_hourly(&self, _query: &ForecastQuery) -> Result<RawSeries, FetchError> {
        Ok(Vec::new())
    }
}

fn settings() -> PipelineSettings {
    PipelineSettings {
        schema: ParameterSchema::basic(),
        variable: "direct_radiation".to_string(),
        timezone: TimezonePolicy::Auto,
        default_latitude: 4.624335,
        default_longitude: -74.063644,
        default_area: 100.0,
    }
}

#[tokio::test]
async fn health_ready_metrics_endpoints() {
    let (app, state) = solgen_cli::build_app(Arc::new(EmptyProvider), settings());

    // /healthz returns 200 and increments a counter
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // /readyz initially 503
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    // Set ready
    solgen_cli::set_ready(&state, true);

    // /readyz now 200
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // /metrics returns prometheus text and contains our counter
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("solgen_requests_total"));
}
