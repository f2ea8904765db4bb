//! Human-readable summary report for the residual value pipeline.

use crate::rv::types::RvForecast;

/// Assembles the lines of `rv_report.txt`. The example block shows the
/// first fitted group in output order.
pub fn build_report(input_name: &str, forecasts: &[RvForecast]) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("EV Residual Value Risk — Summary".to_string());
    lines.push("================================".to_string());
    lines.push(format!("Input: {input_name}"));
    lines.push(format!("Models fitted: {}", forecasts.len()));

    if let Some(example) = forecasts.first() {
        lines.push(format!(
            "Example: {} {} (n={})",
            example.make, example.model, example.n_samples
        ));
        let horizons = [
            (3, example.rv_3y_base, example.rv_3y_cons, example.rv_3y_stress),
            (4, example.rv_4y_base, example.rv_4y_cons, example.rv_4y_stress),
            (5, example.rv_5y_base, example.rv_5y_cons, example.rv_5y_stress),
        ];
        for (h, base, cons, stress) in horizons {
            lines.push(format!(
                "  RV @ {h}y (base/cons/stress): £{base:.0} / £{cons:.0} / £{stress:.0}"
            ));
        }
    }

    lines
}
