//! Fixed-horizon scenario projection for fitted curves.
//!
//! The scenario multipliers are policy knobs, not calibrated estimates.

use serde::Serialize;

use crate::rv::fit::DepreciationCurve;

/// Forecast horizons, in years from now.
pub const HORIZONS_YEARS: [u32; 3] = [3, 4, 5];

pub const OPTIMISTIC_MULTIPLIER: f64 = 1.05;
pub const CONSERVATIVE_MULTIPLIER: f64 = 0.90;
pub const STRESSED_MULTIPLIER: f64 = 0.80;

/// Projected value at a single horizon under the fixed scenario set.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HorizonProjection {
    pub horizon_years: u32,
    pub base: f64,
    pub optimistic: f64,
    pub conservative: f64,
    pub stressed: f64,
}

/// Projects one horizon off a fitted curve.
pub fn project(curve: &DepreciationCurve, horizon_years: u32) -> HorizonProjection {
    let base = curve.predict(horizon_years as f64);
    HorizonProjection {
        horizon_years,
        base,
        optimistic: base * OPTIMISTIC_MULTIPLIER,
        conservative: base * CONSERVATIVE_MULTIPLIER,
        stressed: base * STRESSED_MULTIPLIER,
    }
}

/// Projects all standard horizons, in horizon order.
pub fn project_horizons(curve: &DepreciationCurve) -> [HorizonProjection; 3] {
    HORIZONS_YEARS.map(|h| project(curve, h))
}
