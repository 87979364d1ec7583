//! Chart-facing rollups over a derived series
//!
//! Rows arrive hourly, so a kW reading contributes its value directly as
//! kWh when summed. Input rows are already display-rounded; each rollup
//! re-rounds its own sums.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::series::round3;
use crate::types::DerivedSeries;

/// Running energy total, one point per hour (cumulative area chart)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativePoint {
    pub time: NaiveDateTime,
    pub energy_kwh: f64,
}

/// One day of hourly power, for hour-of-day overlay charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayProfile {
    pub date: NaiveDate,
    pub points: Vec<HourPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourPoint {
    pub hour: u32,
    pub power_kw: f64,
}

/// Daily energy total, for per-day bar charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub energy_kwh: f64,
}

pub fn cumulative_energy(series: &DerivedSeries) -> Vec<CumulativePoint> {
    let mut total = 0.0;
    series
        .iter()
        .map(|row| {
            total += row.power_kw;
            CumulativePoint {
                time: row.time,
                energy_kwh: round3(total),
            }
        })
        .collect()
}

pub fn daily_profiles(series: &DerivedSeries) -> Vec<DayProfile> {
    let mut days: Vec<DayProfile> = Vec::new();
    for row in series {
        let date = row.time.date();
        let point = HourPoint {
            hour: row.time.hour(),
            power_kw: row.power_kw,
        };
        match days.last_mut() {
            Some(day) if day.date == date => day.points.push(point),
            _ => days.push(DayProfile {
                date,
                points: vec![point],
            }),
        }
    }
    days
}

pub fn daily_totals(series: &DerivedSeries) -> Vec<DayTotal> {
    let mut days: Vec<DayTotal> = Vec::new();
    for row in series {
        let date = row.time.date();
        match days.last_mut() {
            Some(day) if day.date == date => day.energy_kwh += row.power_kw,
            _ => days.push(DayTotal {
                date,
                energy_kwh: row.power_kw,
            }),
        }
    }
    for day in &mut days {
        day.energy_kwh = round3(day.energy_kwh);
    }
    days
}
