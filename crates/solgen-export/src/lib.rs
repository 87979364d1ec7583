//! CSV rendering of a derived series
//!
//! The dashboard offers the forecast as a spreadsheet download: a data
//! sheet with unit-annotated headers, plus an optional metadata sheet
//! describing the validated request.

use std::path::Path;

use anyhow::Result;
use csv::WriterBuilder;
use solgen_core::{DerivedSeries, TypedParameters};

/// Timestamp layout used in exported rows
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render the data sheet: one row per forecast hour
pub fn series_csv(series: &DerivedSeries, variable: &str) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    write_series(&mut writer, series, variable)?;
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("finishing csv: {e}"))
}

/// Write the data sheet to a file on disk
pub fn write_series_file(path: &Path, series: &DerivedSeries, variable: &str) -> Result<()> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    write_series(&mut writer, series, variable)?;
    writer.flush()?;
    Ok(())
}

fn write_series<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    series: &DerivedSeries,
    variable: &str,
) -> Result<()> {
    writer.write_record(&[
        "time".to_string(),
        format!("{variable} [kW/m²]"),
        "power [kW]".to_string(),
    ])?;
    for row in series {
        writer.write_record(&[
            row.time.format(TIME_FORMAT).to_string(),
            row.irradiance_kw_m2.to_string(),
            row.power_kw.to_string(),
        ])?;
    }
    Ok(())
}

/// Render the metadata sheet: the validated request as key/value rows
pub fn metadata_csv(params: &TypedParameters, variable: &str) -> Result<Vec<u8>> {
    let mut rows = vec![
        ("parameter", "value".to_string()),
        ("latitude", params.latitude.to_string()),
        ("longitude", params.longitude.to_string()),
        ("area [m²]", params.area.to_string()),
        ("start_date", params.start_date.to_string()),
        ("end_date", params.end_date.to_string()),
        ("weather variable", variable.to_string()),
    ];
    if let Some(asset) = &params.asset {
        rows.push(("code", asset.code.clone()));
        rows.push(("capacity [kW]", asset.capacity.to_string()));
        rows.push(("voltage [V]", asset.voltage.to_string()));
    }

    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    for (name, value) in rows {
        writer.write_record([name.to_string(), value])?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("finishing csv: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use solgen_core::{AssetParameters, SeriesRow};

    fn series() -> DerivedSeries {
        vec![
            SeriesRow {
                time: NaiveDate::from_ymd_opt(2024, 4, 25)
                    .unwrap()
                    .and_hms_opt(10, 0, 0)
                    .unwrap(),
                irradiance_kw_m2: 0.3,
                power_kw: 48.54,
            },
            SeriesRow {
                time: NaiveDate::from_ymd_opt(2024, 4, 25)
                    .unwrap()
                    .and_hms_opt(11, 0, 0)
                    .unwrap(),
                irradiance_kw_m2: 0.452,
                power_kw: 73.134,
            },
        ]
    }

    fn params() -> TypedParameters {
        TypedParameters {
            latitude: 4.624335,
            longitude: -74.063644,
            area: 161.8,
            start_date: NaiveDate::from_ymd_opt(2024, 4, 25).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            asset: Some(AssetParameters {
                code: "BOG-PV-07".to_string(),
                capacity: 50.0,
                voltage: 220.0,
            }),
        }
    }

    #[test]
    fn test_series_csv_layout() {
        let bytes = series_csv(&series(), "direct_radiation").unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "time,direct_radiation [kW/m²],power [kW]"
        );
        assert_eq!(lines.next().unwrap(), "2024-04-25 10:00,0.3,48.54");
        assert_eq!(lines.next().unwrap(), "2024-04-25 11:00,0.452,73.134");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_metadata_csv_includes_asset_rows() {
        let bytes = metadata_csv(&params(), "direct_radiation").unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("latitude,4.624335"));
        assert!(text.contains("area [m²],161.8"));
        assert!(text.contains("code,BOG-PV-07"));
        assert!(text.contains("voltage [V],220"));
    }

    #[test]
    fn test_metadata_csv_without_asset() {
        let mut no_asset = params();
        no_asset.asset = None;
        let bytes = metadata_csv(&no_asset, "direct_radiation").unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains("code"));
        assert!(!text.contains("voltage"));
    }

    #[test]
    fn test_write_series_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forecast.csv");
        write_series_file(&path, &series(), "direct_radiation").unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("time,direct_radiation [kW/m²],power [kW]"));
        assert_eq!(text.lines().count(), 3);
    }
}
