//! Rows and summaries produced by the trend pipeline.

use serde::Serialize;

use crate::trends::normalize::{FuelCategory, Keepership};
use crate::trends::period::Quarter;

/// One aggregated time-series row, unique per (fuel, keepership, period).
/// Serializes directly into `cleaned_ev_timeseries.csv`.
#[derive(Debug, Clone, Serialize)]
pub struct TrendRow {
    #[serde(rename = "Fuel")]
    pub fuel: FuelCategory,
    #[serde(rename = "Keepership")]
    pub keepership: Keepership,
    #[serde(rename = "Period")]
    pub period: Quarter,
    #[serde(rename = "Vehicles")]
    pub vehicles: f64,
}

/// Growth between the global first and latest observed periods for one
/// (fuel, keepership) series.
///
/// `pct_change` is `None` when the series has no value (or a zero value) at
/// the first period; the display counts fall back to 0 in that case.
#[derive(Debug, Clone, Serialize)]
pub struct GrowthRecord {
    pub fuel: FuelCategory,
    pub keepership: Keepership,
    pub first_period: Quarter,
    pub latest_period: Quarter,
    pub first_vehicles: u64,
    pub latest_vehicles: u64,
    pub pct_change: Option<f64>,
}

/// Everything the trend pipeline derives from one input file.
#[derive(Debug, Clone, Serialize)]
pub struct TrendSummary {
    pub first_period: Quarter,
    pub latest_period: Quarter,
    pub rows: Vec<TrendRow>,
    pub growth: Vec<GrowthRecord>,
    /// Company-kept share of the latest period, in percent. `None` when the
    /// latest-period total is zero.
    pub company_share_pct: Option<f64>,
}
