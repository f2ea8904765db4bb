//! End-to-end fleet trend pipeline: load the wide licensing CSV, normalize
//! categories, aggregate by (fuel, keepership, period), and write the
//! outputs.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::chart;
use crate::output;
use crate::trends::aggregate::{
    self, AggregateMap, company_share_pct, growth_records, period_range, to_rows,
};
use crate::trends::columns::inspect_headers;
use crate::trends::normalize::{coerce_count, normalize_fuel, normalize_keepership};
use crate::trends::report::build_report;
use crate::trends::types::TrendSummary;

/// Runs the pipeline over `input`, writing `cleaned_ev_timeseries.csv`,
/// `ev_growth.png`, and `report.txt` into `out_dir`.
pub fn run(input: &Path, out_dir: &Path) -> Result<TrendSummary> {
    let file = File::open(input)
        .with_context(|| format!("failed to open licensing CSV '{}'", input.display()))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .context("failed to read licensing CSV headers")?
        .clone();
    let layout = inspect_headers(&headers)?;

    info!(
        quarter_columns = layout.quarter_cols.len(),
        "Header layout resolved"
    );

    let mut map = AggregateMap::new();
    let mut rows_read = 0usize;
    let mut rows_dropped = 0usize;

    for result in reader.records() {
        rows_read += 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Dropping unreadable CSV record");
                rows_dropped += 1;
                continue;
            }
        };

        let fuel = record.get(layout.fuel_idx).and_then(normalize_fuel);
        let keepership = record
            .get(layout.keepership_idx)
            .and_then(normalize_keepership);
        let (Some(fuel), Some(keepership)) = (fuel, keepership) else {
            rows_dropped += 1;
            continue;
        };

        for &(idx, period) in &layout.quarter_cols {
            let value = coerce_count(record.get(idx).unwrap_or(""));
            aggregate::accumulate(&mut map, fuel, keepership, period, value);
        }
    }

    info!(rows_read, rows_dropped, "Source rows normalized");

    let rows = to_rows(&map);
    let Some((first_period, latest_period)) = period_range(&rows) else {
        bail!("no rows with recognized fuel and keepership categories remain after cleaning");
    };

    let growth = growth_records(&rows, first_period, latest_period);
    let company_share = company_share_pct(&rows, latest_period);

    let summary = TrendSummary {
        first_period,
        latest_period,
        rows,
        growth,
        company_share_pct: company_share,
    };

    output::write_csv(out_dir.join("cleaned_ev_timeseries.csv"), &summary.rows)?;

    if let Err(e) = chart::render_trend_chart(&out_dir.join("ev_growth.png"), &summary.rows) {
        warn!(error = %e, "Chart rendering failed, continuing without plot");
    }

    output::write_text_report(out_dir.join("report.txt"), &build_report(&summary))?;

    Ok(summary)
}
