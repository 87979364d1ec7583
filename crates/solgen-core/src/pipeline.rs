//! The provider seam of the pipeline

use thiserror::Error;

use crate::query::ForecastQuery;
use crate::types::RawSeries;

/// Failure fetching from the forecast provider. Surfaced to the caller
/// as-is; there is no retry policy.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("provider returned HTTP {0}")]
    Http(u16),

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// A source of hourly irradiance forecasts
#[async_trait::async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch_hourly(&self, query: &ForecastQuery) -> Result<RawSeries, FetchError>;
}
