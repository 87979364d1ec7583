//! Declarative parameter schemas
//!
//! Each dashboard variant requires a fixed, named set of query parameters.
//! The schema drives the validator, so per-field branches stay out of it:
//! a field is its name, its semantic type, and optional numeric bounds.

/// Semantic type a raw string value must coerce to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Parses as a floating-point number
    Number,
    /// Parses as a YYYY-MM-DD calendar date
    Date,
    /// Any non-empty string
    Text,
}

/// One schema entry: name, type, and closed numeric bounds checked after
/// parsing. Date fields are bounded by the forecast window instead.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FieldSpec {
    const fn number(name: &'static str, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            name,
            kind: FieldKind::Number,
            min,
            max,
        }
    }

    const fn date(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Date,
            min: None,
            max: None,
        }
    }

    const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            min: None,
            max: None,
        }
    }
}

/// Smallest accepted installation area (m²)
pub const MIN_AREA_M2: f64 = 0.0001;

const BASIC_FIELDS: &[FieldSpec] = &[
    FieldSpec::number("latitude", Some(-90.0), Some(90.0)),
    FieldSpec::number("longitude", Some(-180.0), Some(180.0)),
    FieldSpec::number("area", Some(MIN_AREA_M2), None),
    FieldSpec::date("start_date"),
    FieldSpec::date("end_date"),
];

const FULL_FIELDS: &[FieldSpec] = &[
    FieldSpec::number("latitude", Some(-90.0), Some(90.0)),
    FieldSpec::number("longitude", Some(-180.0), Some(180.0)),
    FieldSpec::number("area", Some(MIN_AREA_M2), None),
    FieldSpec::date("start_date"),
    FieldSpec::date("end_date"),
    FieldSpec::text("code"),
    FieldSpec::number("capacity", None, None),
    FieldSpec::number("voltage", None, None),
];

/// Ordered field set a pipeline variant requires
#[derive(Debug, Clone)]
pub struct ParameterSchema {
    fields: &'static [FieldSpec],
}

impl ParameterSchema {
    /// Location and forecast-window parameters only
    pub fn basic() -> Self {
        Self {
            fields: BASIC_FIELDS,
        }
    }

    /// Location, forecast window, and asset metadata
    pub fn full() -> Self {
        Self {
            fields: FULL_FIELDS,
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        self.fields
    }

    /// Whether this schema carries the code/capacity/voltage asset fields
    pub fn has_asset_fields(&self) -> bool {
        self.fields.iter().any(|f| f.name == "code")
    }
}
