//! HTTP client for the Open-Meteo forecast API
//!
//! Fetches the hourly block for one weather variable and adapts the JSON
//! payload (parallel `time` / value arrays plus a `hourly_units` map) into
//! the core raw series. Failures are classified, never retried.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;

use solgen_core::{FetchError, ForecastProvider, ForecastQuery, RawSample, RawSeries};

/// Timestamp layout in the provider's `hourly.time` array
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Unit the provider reports irradiance variables in
const IRRADIANCE_UNIT: &str = "W/m²";

pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl OpenMeteoClient {
    /// Public API endpoint
    pub const DEFAULT_BASE_URL: &'static str = "https://api.open-meteo.com/v1/forecast";

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    async fn fetch_hourly(&self, query: &ForecastQuery) -> Result<RawSeries, FetchError> {
        let url = query
            .url(&self.base_url)
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let response = self.client.get(url).send().await.map_err(classify)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        let payload: ForecastResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Malformed(e.to_string())
            }
        })?;

        to_series(&payload, &query.variable)
    }
}

fn classify(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if let Some(status) = error.status() {
        FetchError::Http(status.as_u16())
    } else {
        FetchError::Request(error.to_string())
    }
}

/// Provider payload: unit strings plus parallel value arrays keyed by variable
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly_units: HashMap<String, String>,
    hourly: HourlyBlock,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    #[serde(flatten)]
    variables: HashMap<String, Vec<Option<f64>>>,
}

fn to_series(response: &ForecastResponse, variable: &str) -> Result<RawSeries, FetchError> {
    let Some(values) = response.hourly.variables.get(variable) else {
        return Err(FetchError::Malformed(format!(
            "response has no hourly `{variable}` array"
        )));
    };
    if values.len() != response.hourly.time.len() {
        return Err(FetchError::Malformed(format!(
            "`{variable}` has {} values for {} timestamps",
            values.len(),
            response.hourly.time.len()
        )));
    }
    if let Some(unit) = response.hourly_units.get(variable) {
        if unit != IRRADIANCE_UNIT {
            return Err(FetchError::Malformed(format!(
                "unexpected `{variable}` unit `{unit}`"
            )));
        }
    }

    response
        .hourly
        .time
        .iter()
        .zip(values.iter().copied())
        .map(|(stamp, value)| {
            let time = NaiveDateTime::parse_from_str(stamp, TIME_FORMAT)
                .map_err(|e| FetchError::Malformed(format!("bad timestamp `{stamp}`: {e}")))?;
            Ok(RawSample {
                time,
                // null marks hours outside the provider's model run
                irradiance_w_m2: value.unwrap_or(0.0),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> ForecastResponse {
        serde_json::from_str(json).unwrap()
    }

    const SAMPLE: &str = r#"{
        "latitude": 4.625,
        "longitude": -74.0625,
        "hourly_units": {"time": "iso8601", "direct_radiation": "W/m²"},
        "hourly": {
            "time": ["2024-04-25T09:00", "2024-04-25T10:00", "2024-04-25T11:00"],
            "direct_radiation": [120.5, 300.0, null]
        }
    }"#;

    #[test]
    fn test_adapts_hourly_block() {
        let series = to_series(&payload(SAMPLE), "direct_radiation").unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].irradiance_w_m2, 120.5);
        assert_eq!(series[1].irradiance_w_m2, 300.0);
        assert_eq!(
            series[1].time,
            chrono::NaiveDate::from_ymd_opt(2024, 4, 25)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );
        // null reading decodes as zero
        assert_eq!(series[2].irradiance_w_m2, 0.0);
    }

    #[test]
    fn test_missing_variable_is_malformed() {
        let err = to_series(&payload(SAMPLE), "shortwave_radiation").unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn test_length_mismatch_is_malformed() {
        let json = r#"{
            "hourly_units": {"direct_radiation": "W/m²"},
            "hourly": {
                "time": ["2024-04-25T09:00", "2024-04-25T10:00"],
                "direct_radiation": [120.5]
            }
        }"#;
        let err = to_series(&payload(json), "direct_radiation").unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn test_unexpected_unit_is_malformed() {
        let json = r#"{
            "hourly_units": {"direct_radiation": "MJ/m²"},
            "hourly": {
                "time": ["2024-04-25T09:00"],
                "direct_radiation": [1.2]
            }
        }"#;
        let err = to_series(&payload(json), "direct_radiation").unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn test_bad_timestamp_is_malformed() {
        let json = r#"{
            "hourly_units": {"direct_radiation": "W/m²"},
            "hourly": {
                "time": ["25/04/2024 09:00"],
                "direct_radiation": [1.2]
            }
        }"#;
        let err = to_series(&payload(json), "direct_radiation").unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }
}
