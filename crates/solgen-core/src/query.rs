//! Forecast query construction
//!
//! Pure formatting: validated parameters are copied verbatim into a
//! provider query descriptor; only the timezone parameter is computed here.

use chrono::NaiveDate;
use serde::Serialize;
use url::Url;

use crate::types::TypedParameters;

/// How the provider `timezone` parameter is resolved
#[derive(Debug, Clone, PartialEq)]
pub enum TimezonePolicy {
    /// A caller-supplied IANA zone name, passed through untouched
    Fixed(String),
    /// The provider's own `auto` keyword (resolved server-side)
    Auto,
    /// Nautical zone derived from longitude, 15 degrees per hour
    FromCoordinates,
}

impl TimezonePolicy {
    pub fn resolve(&self, longitude: f64) -> String {
        match self {
            TimezonePolicy::Fixed(zone) => zone.clone(),
            TimezonePolicy::Auto => "auto".to_string(),
            TimezonePolicy::FromCoordinates => nautical_zone(longitude),
        }
    }
}

/// Etc/GMT zone for a longitude. The Etc area uses the POSIX sign
/// convention: zones east of Greenwich carry a negative suffix.
fn nautical_zone(longitude: f64) -> String {
    let offset = (longitude / 15.0).round() as i32;
    if offset == 0 {
        "Etc/GMT".to_string()
    } else if offset > 0 {
        format!("Etc/GMT-{offset}")
    } else {
        format!("Etc/GMT+{}", -offset)
    }
}

/// Fully resolved provider query, ready to submit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Requested hourly weather variable, e.g. `direct_radiation`
    pub variable: String,
    pub timezone: String,
}

/// Assemble a provider query from validated parameters
pub fn build_query(
    params: &TypedParameters,
    variable: &str,
    timezone: &TimezonePolicy,
) -> ForecastQuery {
    ForecastQuery {
        latitude: params.latitude,
        longitude: params.longitude,
        start_date: params.start_date,
        end_date: params.end_date,
        variable: variable.to_string(),
        timezone: timezone.resolve(params.longitude),
    }
}

impl ForecastQuery {
    /// Render the provider GET URL
    pub fn url(&self, base: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(base)?;
        url.query_pairs_mut()
            .append_pair("latitude", &self.latitude.to_string())
            .append_pair("longitude", &self.longitude.to_string())
            .append_pair("start_date", &self.start_date.to_string())
            .append_pair("end_date", &self.end_date.to_string())
            .append_pair("hourly", &self.variable)
            .append_pair("timezone", &self.timezone);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TypedParameters {
        TypedParameters {
            latitude: 4.624335,
            longitude: -74.063644,
            area: 161.8,
            start_date: NaiveDate::from_ymd_opt(2024, 4, 25).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            asset: None,
        }
    }

    #[test]
    fn test_builder_copies_inputs_verbatim() {
        let query = build_query(&params(), "direct_radiation", &TimezonePolicy::Auto);
        assert_eq!(query.latitude, params().latitude);
        assert_eq!(query.longitude, params().longitude);
        assert_eq!(query.start_date, params().start_date);
        assert_eq!(query.end_date, params().end_date);
        assert_eq!(query.timezone, "auto");
    }

    #[test]
    fn test_url_preserves_numeric_precision() {
        let query = build_query(&params(), "direct_radiation", &TimezonePolicy::Auto);
        let url = query.url("https://api.open-meteo.com/v1/forecast").unwrap();
        let rendered = url.as_str();
        assert!(rendered.contains("latitude=4.624335"));
        assert!(rendered.contains("longitude=-74.063644"));
        assert!(rendered.contains("start_date=2024-04-25"));
        assert!(rendered.contains("end_date=2024-05-01"));
        assert!(rendered.contains("hourly=direct_radiation"));
        assert!(rendered.contains("timezone=auto"));
    }

    #[test]
    fn test_fixed_zone_passes_through() {
        let policy = TimezonePolicy::Fixed("America/Bogota".to_string());
        let query = build_query(&params(), "direct_radiation", &policy);
        assert_eq!(query.timezone, "America/Bogota");
        let url = query.url("https://api.open-meteo.com/v1/forecast").unwrap();
        assert!(url.as_str().contains("timezone=America%2FBogota"));
    }

    #[test]
    fn test_nautical_zone_from_longitude() {
        // Bogota sits near UTC-5
        let query = build_query(&params(), "direct_radiation", &TimezonePolicy::FromCoordinates);
        assert_eq!(query.timezone, "Etc/GMT+5");

        assert_eq!(TimezonePolicy::FromCoordinates.resolve(0.0), "Etc/GMT");
        assert_eq!(TimezonePolicy::FromCoordinates.resolve(100.0), "Etc/GMT-7");
        assert_eq!(TimezonePolicy::FromCoordinates.resolve(179.9), "Etc/GMT-12");
    }
}
