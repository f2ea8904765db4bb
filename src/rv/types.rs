//! Listing rows and forecast records for the residual value pipeline.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Mileage bucket a listing falls into. Derived for downstream segmentation;
/// fits currently pool all buckets per model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MileageBucket {
    UpTo10k,
    To20k,
    To40k,
    To60k,
    Over60k,
    Unknown,
}

impl fmt::Display for MileageBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MileageBucket::UpTo10k => "0-10k",
            MileageBucket::To20k => "10-20k",
            MileageBucket::To40k => "20-40k",
            MileageBucket::To60k => "40-60k",
            MileageBucket::Over60k => "60k+",
            MileageBucket::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

/// A listing that survived row-level cleaning.
#[derive(Debug, Clone)]
pub struct CleanListing {
    pub make: String,
    pub model: String,
    /// Reference year minus model year, clamped at zero.
    pub age_years: f64,
    pub mileage: Option<f64>,
    pub mileage_bucket: MileageBucket,
    pub price: f64,
}

/// One output row of `rv_forecasts.csv`: the projected residual value for a
/// fitted (make, model) group at each horizon and scenario.
#[derive(Debug, Clone, Serialize)]
pub struct RvForecast {
    #[serde(rename = "Make")]
    pub make: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "n_samples")]
    pub n_samples: usize,
    #[serde(rename = "RV_3y_base")]
    pub rv_3y_base: f64,
    #[serde(rename = "RV_4y_base")]
    pub rv_4y_base: f64,
    #[serde(rename = "RV_5y_base")]
    pub rv_5y_base: f64,
    #[serde(rename = "RV_3y_opt")]
    pub rv_3y_opt: f64,
    #[serde(rename = "RV_3y_cons")]
    pub rv_3y_cons: f64,
    #[serde(rename = "RV_3y_stress")]
    pub rv_3y_stress: f64,
    #[serde(rename = "RV_4y_opt")]
    pub rv_4y_opt: f64,
    #[serde(rename = "RV_4y_cons")]
    pub rv_4y_cons: f64,
    #[serde(rename = "RV_4y_stress")]
    pub rv_4y_stress: f64,
    #[serde(rename = "RV_5y_opt")]
    pub rv_5y_opt: f64,
    #[serde(rename = "RV_5y_cons")]
    pub rv_5y_cons: f64,
    #[serde(rename = "RV_5y_stress")]
    pub rv_5y_stress: f64,
}

/// End-of-run summary, logged as JSON.
#[derive(Debug, Serialize)]
pub struct RvRunSummary {
    pub generated_at: DateTime<Utc>,
    pub input: String,
    pub groups_seen: usize,
    pub groups_fitted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mileage_bucket_labels() {
        assert_eq!(MileageBucket::UpTo10k.to_string(), "0-10k");
        assert_eq!(MileageBucket::To20k.to_string(), "10-20k");
        assert_eq!(MileageBucket::To40k.to_string(), "20-40k");
        assert_eq!(MileageBucket::To60k.to_string(), "40-60k");
        assert_eq!(MileageBucket::Over60k.to_string(), "60k+");
        assert_eq!(MileageBucket::Unknown.to_string(), "unknown");
    }
}
