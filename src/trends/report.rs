//! Human-readable summary report for the trend pipeline.

use crate::trends::types::TrendSummary;

/// Assembles the lines of `report.txt`.
pub fn build_report(summary: &TrendSummary) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Fleet EV Trend Analyzer — Summary".to_string());
    lines.push("================================".to_string());
    lines.push(
        "Source: DfT df_VEH0145 (Licensed plug-in vehicles), aggregated across UK LSOAs."
            .to_string(),
    );
    lines.push(format!(
        "Period covered: {} to {}\n",
        summary.first_period, summary.latest_period
    ));

    lines.push("Growth by Fuel & Keepership:".to_string());
    for record in &summary.growth {
        let pct = match record.pct_change {
            Some(p) => format!("{p:.2}%"),
            None => "n/a".to_string(),
        };
        lines.push(format!(
            "- {} ({}): {} → {} vehicles ({})",
            record.fuel, record.keepership, record.first_vehicles, record.latest_vehicles, pct
        ));
    }

    let share = match summary.company_share_pct {
        Some(p) => format!("{p:.2}%"),
        None => "n/a".to_string(),
    };
    lines.push(format!(
        "\nCompany-kept share of all plug-in vehicles (latest quarter): {share}\n"
    ));

    lines.push("Implications for fleet & finance:".to_string());
    lines.push("- BEV growth increases exposure to EV residual value dynamics.".to_string());
    lines.push(
        "- Higher company-kept share signals accelerating fleet electrification → impacts leasing mix & pricing."
            .to_string(),
    );
    lines.push(
        "- Quarterly trends enable remarketing timeline planning and maintenance provisioning.\n"
            .to_string(),
    );
    lines
}
