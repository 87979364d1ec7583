//! Core data types for the forecast pipeline

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw, unvalidated parameters as they arrive from a URL query string or
/// an interactive form (field name -> raw string value)
pub type RawParameters = HashMap<String, String>;

/// Validated, typed parameter set for one render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedParameters {
    pub latitude: f64,

    pub longitude: f64,

    /// Installation area (m²)
    pub area: f64,

    /// First forecast day (inclusive)
    pub start_date: NaiveDate,

    /// Last forecast day (inclusive)
    pub end_date: NaiveDate,

    /// Asset metadata, present when the full schema profile was validated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetParameters>,
}

/// Electrical-asset metadata carried by the full schema profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetParameters {
    /// Asset identification code
    pub code: String,

    /// Installed capacity (kW)
    pub capacity: f64,

    /// Nominal voltage (V)
    pub voltage: f64,
}

/// One hourly sample in provider units (W/m²)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub time: NaiveDateTime,
    pub irradiance_w_m2: f64,
}

/// Hourly irradiance series as fetched, before unit conversion
pub type RawSeries = Vec<RawSample>;

/// One derived output row in display units, rounded for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub time: NaiveDateTime,
    pub irradiance_kw_m2: f64,
    pub power_kw: f64,
}

/// Ordered hourly rows covering the requested date range
pub type DerivedSeries = Vec<SeriesRow>;
