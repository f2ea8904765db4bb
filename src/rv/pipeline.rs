//! End-to-end residual value pipeline: load listings, fit a curve per
//! (make, model) group, project scenarios, and write the outputs.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::chart;
use crate::output;
use crate::rv::fit::{DepreciationCurve, fit_depreciation};
use crate::rv::ingest::load_listings;
use crate::rv::report::build_report;
use crate::rv::scenario::project_horizons;
use crate::rv::types::RvForecast;

/// How many of the largest-sample groups make it onto the curve chart.
const CHART_GROUP_LIMIT: usize = 6;

/// Result of one pipeline run.
#[derive(Debug)]
pub struct RvOutcome {
    pub forecasts: Vec<RvForecast>,
    pub groups_seen: usize,
}

/// Runs the pipeline over `input`, writing `rv_forecasts.csv`,
/// `depreciation_curves.png`, and `rv_report.txt` into `out_dir`.
pub fn run(input: &Path, out_dir: &Path, reference_year: i32) -> Result<RvOutcome> {
    let ingested = load_listings(input, reference_year)?;

    // Group (age, price) pairs per (make, model); BTreeMap keeps the output
    // order deterministic (make then model ascending).
    let mut groups: BTreeMap<(String, String), Vec<(f64, f64)>> = BTreeMap::new();
    for listing in &ingested.listings {
        groups
            .entry((listing.make.clone(), listing.model.clone()))
            .or_default()
            .push((listing.age_years, listing.price));
    }
    let groups_seen = groups.len();

    let mut curves: BTreeMap<(String, String), DepreciationCurve> = BTreeMap::new();
    let mut forecasts = Vec::new();

    for ((make, model), pairs) in &groups {
        let Some(curve) = fit_depreciation(pairs) else {
            info!(%make, %model, samples = pairs.len(), "No usable fit for group, skipping");
            continue;
        };
        if curve.decay > 0.0 {
            warn!(%make, %model, decay = curve.decay, "Fitted curve appreciates with age");
        }

        let [h3, h4, h5] = project_horizons(&curve);
        forecasts.push(RvForecast {
            make: make.clone(),
            model: model.clone(),
            n_samples: pairs.len(),
            rv_3y_base: h3.base,
            rv_4y_base: h4.base,
            rv_5y_base: h5.base,
            rv_3y_opt: h3.optimistic,
            rv_3y_cons: h3.conservative,
            rv_3y_stress: h3.stressed,
            rv_4y_opt: h4.optimistic,
            rv_4y_cons: h4.conservative,
            rv_4y_stress: h4.stressed,
            rv_5y_opt: h5.optimistic,
            rv_5y_cons: h5.conservative,
            rv_5y_stress: h5.stressed,
        });
        curves.insert((make.clone(), model.clone()), curve);
    }

    info!(
        groups_seen,
        groups_fitted = forecasts.len(),
        "Curve fitting complete"
    );

    output::write_csv(out_dir.join("rv_forecasts.csv"), &forecasts)?;

    let chart_curves = largest_groups(&groups, &curves);
    if let Err(e) =
        chart::render_depreciation_curves(&out_dir.join("depreciation_curves.png"), &chart_curves)
    {
        warn!(error = %e, "Chart rendering failed, continuing without plot");
    }

    let input_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("listings.csv");
    output::write_text_report(out_dir.join("rv_report.txt"), &build_report(input_name, &forecasts))?;

    Ok(RvOutcome {
        forecasts,
        groups_seen,
    })
}

/// Picks the fitted curves of up to [`CHART_GROUP_LIMIT`] groups, largest
/// sample count first (name order breaks ties).
fn largest_groups(
    groups: &BTreeMap<(String, String), Vec<(f64, f64)>>,
    curves: &BTreeMap<(String, String), DepreciationCurve>,
) -> Vec<(String, DepreciationCurve)> {
    let mut sized: Vec<(&(String, String), usize)> =
        groups.iter().map(|(key, pairs)| (key, pairs.len())).collect();
    sized.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    sized
        .into_iter()
        .take(CHART_GROUP_LIMIT)
        .filter_map(|(key, _)| {
            curves
                .get(key)
                .map(|curve| (format!("{} {}", key.0, key.1), *curve))
        })
        .collect()
}
