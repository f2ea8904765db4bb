//! PNG chart rendering via plotters.
//!
//! Both pipelines emit one line chart each: the quarterly trend series and
//! the fitted depreciation curves. Callers treat chart errors as non-fatal;
//! the CSV and report outputs never depend on a chart rendering.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Result, bail};
use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};

use crate::rv::fit::DepreciationCurve;
use crate::trends::normalize::{FuelCategory, Keepership};
use crate::trends::types::TrendRow;

const CHART_SIZE: (u32, u32) = (1000, 600);

/// Candidate font files for chart text. The first one that loads is
/// registered as the `sans-serif` face used by every chart.
const FONT_CANDIDATES: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

static FONT_REGISTERED: LazyLock<bool> = LazyLock::new(|| {
    for path in FONT_CANDIDATES {
        if let Ok(bytes) = std::fs::read(path) {
            let leaked: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if register_font("sans-serif", FontStyle::Normal, leaked).is_ok() {
                return true;
            }
        }
    }
    false
});

fn ensure_font() -> Result<()> {
    if *FONT_REGISTERED {
        Ok(())
    } else {
        bail!("no usable chart font found on this host")
    }
}

/// Maximum age on the depreciation plot grid, in years.
pub const CURVE_GRID_MAX_AGE: f64 = 8.0;
/// Number of grid points, giving a 0.1-year step.
pub const CURVE_GRID_POINTS: usize = 81;

/// Dense age grid used for plotting fitted curves.
pub fn age_grid() -> impl Iterator<Item = f64> {
    (0..CURVE_GRID_POINTS)
        .map(|i| i as f64 * CURVE_GRID_MAX_AGE / (CURVE_GRID_POINTS - 1) as f64)
}

/// Renders the quarterly trend chart: one line per (fuel, keepership)
/// series present in `rows`.
pub fn render_trend_chart(path: &Path, rows: &[TrendRow]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    ensure_font()?;

    let combos = [
        (FuelCategory::BatteryElectric, Keepership::Company),
        (FuelCategory::BatteryElectric, Keepership::Private),
        (FuelCategory::PluginHybrid, Keepership::Company),
        (FuelCategory::PluginHybrid, Keepership::Private),
    ];

    let series: Vec<(String, Vec<(f64, f64)>)> = combos
        .iter()
        .filter_map(|&(fuel, keepership)| {
            let points: Vec<(f64, f64)> = rows
                .iter()
                .filter(|r| r.fuel == fuel && r.keepership == keepership)
                .map(|r| (r.period.axis_value(), r.vehicles))
                .collect();
            if points.is_empty() {
                None
            } else {
                Some((format!("{fuel} – {keepership}"), points))
            }
        })
        .collect();

    let x_min = rows.iter().map(|r| r.period.axis_value()).fold(f64::INFINITY, f64::min);
    let x_max = rows.iter().map(|r| r.period.axis_value()).fold(f64::NEG_INFINITY, f64::max) + 0.25;
    let y_max = rows.iter().map(|r| r.vehicles).fold(0.0, f64::max).max(1.0) * 1.05;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("UK Plug-in Vehicles by Fuel & Keepership (2015–2025)", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Quarter")
        .y_desc("Licensed Vehicles")
        .x_label_formatter(&format_quarter_axis)
        .draw()?;

    for (idx, (label, points)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Renders fitted depreciation curves over the plot grid. With no fitted
/// curves at all, draws a placeholder message instead of an empty chart.
pub fn render_depreciation_curves(
    path: &Path,
    curves: &[(String, DepreciationCurve)],
) -> Result<()> {
    ensure_font()?;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    if curves.is_empty() {
        root.draw(&Text::new(
            "Insufficient data to plot curves.",
            (340, 290),
            ("sans-serif", 20),
        ))?;
        root.present()?;
        return Ok(());
    }

    let y_max = curves
        .iter()
        .flat_map(|(_, curve)| age_grid().map(|age| curve.predict(age)))
        .fold(0.0, f64::max)
        * 1.05;

    let mut chart = ChartBuilder::on(&root)
        .caption("Estimated EV Depreciation Curves (example models)", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..CURVE_GRID_MAX_AGE, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Age (years)")
        .y_desc("Estimated Price (£)")
        .draw()?;

    for (idx, (label, curve)) in curves.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let points: Vec<(f64, f64)> = age_grid().map(|age| (age, curve.predict(age))).collect();
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))?
            .label(label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn format_quarter_axis(value: &f64) -> String {
    let year = value.floor();
    let quarter = ((value - year) * 4.0).round().min(3.0) as u8 + 1;
    format!("{}Q{}", year as i32, quarter)
}
