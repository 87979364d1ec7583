//! Parameter validation against a declarative schema
//!
//! Pure over its inputs: the forecast window is anchored at an injected
//! reference date, never the ambient clock. Validation runs in three
//! stages (presence, lexical, range); each stage reports every failure it
//! finds, and a failed stage stops the run so later stages never see
//! values an earlier stage rejected.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::schema::{FieldKind, FieldSpec, ParameterSchema};
use crate::types::{AssetParameters, RawParameters, TypedParameters};

/// Date layout accepted for start_date / end_date
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Provider forecast horizon in days (today counts as day one)
pub const FORECAST_HORIZON_DAYS: i64 = 7;

/// One rejected field with the reason it was rejected
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: ValidationReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationReason {
    #[error("parameter is missing")]
    Missing,

    #[error("parameter is empty")]
    Empty,

    #[error("`{value}` is not a number")]
    NotANumber { value: String },

    #[error("`{value}` is not a YYYY-MM-DD date")]
    NotADate { value: String },

    #[error("`{value}` is outside {bound}")]
    OutOfRange { value: String, bound: String },
}

/// Successful validation outcome
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// None of the schema fields were supplied: the caller falls back to
    /// its interactive default mode rather than reporting an error
    NoParams,
    /// All fields supplied and valid
    Params(TypedParameters),
}

/// Validate a raw parameter map against `schema`, anchoring the forecast
/// window at `reference_date`.
pub fn validate(
    raw: &RawParameters,
    schema: &ParameterSchema,
    reference_date: NaiveDate,
) -> Result<Outcome, Vec<ValidationError>> {
    // Presence is all-or-nothing: an empty set means interactive mode, a
    // partial set is rejected without looking at any value.
    let missing: Vec<&FieldSpec> = schema
        .fields()
        .iter()
        .filter(|f| !raw.contains_key(f.name))
        .collect();
    if missing.len() == schema.fields().len() {
        return Ok(Outcome::NoParams);
    }
    if !missing.is_empty() {
        return Err(missing
            .into_iter()
            .map(|f| ValidationError {
                field: f.name.to_string(),
                reason: ValidationReason::Missing,
            })
            .collect());
    }

    // Lexical stage: empties and unparseable values
    let mut errors = Vec::new();
    let mut numbers: HashMap<&str, f64> = HashMap::new();
    let mut dates: HashMap<&str, NaiveDate> = HashMap::new();

    for field in schema.fields() {
        let value = &raw[field.name];
        if value.is_empty() {
            errors.push(ValidationError {
                field: field.name.to_string(),
                reason: ValidationReason::Empty,
            });
            continue;
        }
        match field.kind {
            FieldKind::Number => match value.parse::<f64>() {
                Ok(parsed) => {
                    numbers.insert(field.name, parsed);
                }
                Err(_) => errors.push(ValidationError {
                    field: field.name.to_string(),
                    reason: ValidationReason::NotANumber {
                        value: value.clone(),
                    },
                }),
            },
            FieldKind::Date => match NaiveDate::parse_from_str(value, DATE_FORMAT) {
                Ok(parsed) => {
                    dates.insert(field.name, parsed);
                }
                Err(_) => errors.push(ValidationError {
                    field: field.name.to_string(),
                    reason: ValidationReason::NotADate {
                        value: value.clone(),
                    },
                }),
            },
            FieldKind::Text => {}
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    // Range stage: numeric bounds, the forecast window, and date ordering
    let window_start = reference_date;
    let window_end = reference_date + Duration::days(FORECAST_HORIZON_DAYS - 1);

    for field in schema.fields() {
        match field.kind {
            FieldKind::Number => {
                let value = numbers[field.name];
                if !in_bounds(value, field.min, field.max) {
                    errors.push(ValidationError {
                        field: field.name.to_string(),
                        reason: ValidationReason::OutOfRange {
                            value: value.to_string(),
                            bound: bound_text(field.min, field.max),
                        },
                    });
                }
            }
            FieldKind::Date => {
                let value = dates[field.name];
                if value < window_start || value > window_end {
                    errors.push(ValidationError {
                        field: field.name.to_string(),
                        reason: ValidationReason::OutOfRange {
                            value: value.to_string(),
                            bound: format!("[{window_start}, {window_end}]"),
                        },
                    });
                }
            }
            FieldKind::Text => {}
        }
    }
    if let (Some(start), Some(end)) = (dates.get("start_date"), dates.get("end_date")) {
        if end < start {
            errors.push(ValidationError {
                field: "end_date".to_string(),
                reason: ValidationReason::OutOfRange {
                    value: end.to_string(),
                    bound: format!("on or after start_date {start}"),
                },
            });
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let asset = if schema.has_asset_fields() {
        Some(AssetParameters {
            code: raw["code"].clone(),
            capacity: numbers["capacity"],
            voltage: numbers["voltage"],
        })
    } else {
        None
    };

    Ok(Outcome::Params(TypedParameters {
        latitude: numbers["latitude"],
        longitude: numbers["longitude"],
        area: numbers["area"],
        start_date: dates["start_date"],
        end_date: dates["end_date"],
        asset,
    }))
}

fn in_bounds(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    min.map_or(true, |lo| value >= lo) && max.map_or(true, |hi| value <= hi)
}

fn bound_text(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("[{lo}, {hi}]"),
        (Some(lo), None) => format!("[{lo}, +inf)"),
        (None, Some(hi)) => format!("(-inf, {hi}]"),
        (None, None) => "(-inf, +inf)".to_string(),
    }
}
