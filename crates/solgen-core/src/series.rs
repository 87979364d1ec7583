//! Irradiance-to-power derivation
//!
//! Converts the provider's hourly W/m² readings into kW/m² irradiance and
//! instantaneous panel power for a given installation area. Every step is
//! total and side-effect free; rounding is terminal formatting applied
//! once, and no higher-precision copy is kept.

use crate::types::{DerivedSeries, RawSeries, SeriesRow};

const W_PER_KW: f64 = 1000.0;

/// Round to 3 decimals for display
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// The provider occasionally reports small negative irradiance at night
fn clamp_night_noise(w_m2: f64) -> f64 {
    w_m2.max(0.0)
}

/// Derive the display series for `area_m2` of panel surface
pub fn derive_series(raw: &RawSeries, area_m2: f64) -> DerivedSeries {
    raw.iter()
        .map(|sample| {
            let irradiance_kw_m2 = clamp_night_noise(sample.irradiance_w_m2) / W_PER_KW;
            let power_kw = irradiance_kw_m2 * area_m2;
            SeriesRow {
                time: sample.time,
                irradiance_kw_m2: round3(irradiance_kw_m2),
                power_kw: round3(power_kw),
            }
        })
        .collect()
}
