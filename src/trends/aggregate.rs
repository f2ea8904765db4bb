//! Wide-to-long reshaping and (fuel, keepership, period) aggregation.
//!
//! Aggregation accumulates into a `BTreeMap` keyed by the composite
//! category/period key, so iterating the map yields rows sorted by category
//! then period ascending. That ordering is an output contract of
//! `cleaned_ev_timeseries.csv`, not an accident of implementation.

use std::collections::BTreeMap;

use crate::trends::normalize::{FuelCategory, Keepership};
use crate::trends::period::Quarter;
use crate::trends::types::{GrowthRecord, TrendRow};

/// Periods outside this year window are discarded before aggregation.
pub const YEAR_MIN: i32 = 2015;
pub const YEAR_MAX: i32 = 2025;

/// Accumulator for summed vehicle counts.
pub type AggregateMap = BTreeMap<(FuelCategory, Keepership, Quarter), f64>;

/// Adds one long-form observation, dropping periods outside the year window.
pub fn accumulate(
    map: &mut AggregateMap,
    fuel: FuelCategory,
    keepership: Keepership,
    period: Quarter,
    vehicles: f64,
) {
    if period.year < YEAR_MIN || period.year > YEAR_MAX {
        return;
    }
    *map.entry((fuel, keepership, period)).or_insert(0.0) += vehicles;
}

/// Flattens the accumulator into sorted output rows.
pub fn to_rows(map: &AggregateMap) -> Vec<TrendRow> {
    map.iter()
        .map(|(&(fuel, keepership, period), &vehicles)| TrendRow {
            fuel,
            keepership,
            period,
            vehicles,
        })
        .collect()
}

/// Global first and latest periods across every aggregated row.
pub fn period_range(rows: &[TrendRow]) -> Option<(Quarter, Quarter)> {
    let first = rows.iter().map(|r| r.period).min()?;
    let latest = rows.iter().map(|r| r.period).max()?;
    Some((first, latest))
}

/// Percent change between two anchor values. Undefined when the first value
/// is missing or zero.
pub fn pct_change(first: Option<f64>, last: Option<f64>) -> Option<f64> {
    let first = first?;
    let last = last?;
    if first == 0.0 {
        return None;
    }
    Some((last - first) / first * 100.0)
}

/// Builds one growth record per (fuel, keepership) series.
///
/// Anchors are the *global* first and latest periods, not each series' own
/// extent: a series with no data at an anchor reports 0 there and an
/// undefined percent change.
pub fn growth_records(rows: &[TrendRow], first: Quarter, latest: Quarter) -> Vec<GrowthRecord> {
    let mut series: BTreeMap<(FuelCategory, Keepership), BTreeMap<Quarter, f64>> = BTreeMap::new();
    for row in rows {
        series
            .entry((row.fuel, row.keepership))
            .or_default()
            .insert(row.period, row.vehicles);
    }

    series
        .into_iter()
        .map(|((fuel, keepership), by_period)| {
            let first_value = by_period.get(&first).copied();
            let latest_value = by_period.get(&latest).copied();
            GrowthRecord {
                fuel,
                keepership,
                first_period: first,
                latest_period: latest,
                first_vehicles: first_value.map(|v| v.round() as u64).unwrap_or(0),
                latest_vehicles: latest_value.map(|v| v.round() as u64).unwrap_or(0),
                pct_change: pct_change(first_value, latest_value).map(round2),
            }
        })
        .collect()
}

/// Company-kept share of all keepership categories at the latest period, in
/// percent. `None` when the latest-period total is zero.
pub fn company_share_pct(rows: &[TrendRow], latest: Quarter) -> Option<f64> {
    let mut company = 0.0;
    let mut total = 0.0;
    for row in rows.iter().filter(|r| r.period == latest) {
        if row.keepership == Keepership::Company {
            company += row.vehicles;
        }
        total += row.vehicles;
    }
    if total == 0.0 {
        return None;
    }
    Some(round2(company / total * 100.0))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
