use std::env;
use std::fs;
use std::path::PathBuf;

use ev_fleet_rv::rv;
use ev_fleet_rv::synth;
use ev_fleet_rv::trends;

fn setup_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_rv_pipeline_end_to_end() {
    let dir = setup_dir("ev_fleet_rv_it_rv");
    let listings_path = dir.join("listings.csv");

    // 140 listings per model across the 8-model catalog: every group clears
    // the minimum-sample threshold.
    let rows = synth::generate(140, synth::DEFAULT_SEED).unwrap();
    synth::write_listings(&listings_path, &rows).unwrap();

    let outcome = rv::pipeline::run(&listings_path, &dir, 2025).unwrap();

    assert_eq!(outcome.groups_seen, 8);
    assert_eq!(outcome.forecasts.len(), 8);

    for forecast in &outcome.forecasts {
        assert_eq!(forecast.n_samples, 140);
        let values = [
            forecast.rv_3y_base,
            forecast.rv_4y_base,
            forecast.rv_5y_base,
            forecast.rv_3y_opt,
            forecast.rv_3y_cons,
            forecast.rv_3y_stress,
            forecast.rv_4y_opt,
            forecast.rv_4y_cons,
            forecast.rv_4y_stress,
            forecast.rv_5y_opt,
            forecast.rv_5y_cons,
            forecast.rv_5y_stress,
        ];
        assert!(values.iter().all(|v| v.is_finite() && *v > 0.0));

        assert!(forecast.rv_3y_stress <= forecast.rv_3y_cons);
        assert!(forecast.rv_3y_cons <= forecast.rv_3y_base);
        assert!(forecast.rv_3y_base <= forecast.rv_3y_opt);
    }

    // Output order contract: make then model ascending.
    let keys: Vec<(String, String)> = outcome
        .forecasts
        .iter()
        .map(|f| (f.make.clone(), f.model.clone()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    let forecasts_csv = fs::read_to_string(dir.join("rv_forecasts.csv")).unwrap();
    assert!(forecasts_csv.starts_with("Make,Model,n_samples,RV_3y_base"));
    assert_eq!(forecasts_csv.lines().count(), 9);
    assert!(dir.join("rv_report.txt").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_generator_is_reproducible_on_disk() {
    let dir = setup_dir("ev_fleet_rv_it_gen");
    let a = dir.join("a.csv");
    let b = dir.join("b.csv");

    let rows_a = synth::generate(25, 7).unwrap();
    let rows_b = synth::generate(25, 7).unwrap();
    synth::write_listings(&a, &rows_a).unwrap();
    synth::write_listings(&b, &rows_b).unwrap();

    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_trend_pipeline_end_to_end() {
    let dir = setup_dir("ev_fleet_rv_it_trends");
    let input = dir.join("licensing.csv");
    fs::write(
        &input,
        "Fuel,Keepership,2015 Q1,2018 Q3,2020 Q4\n\
         Battery electric,Company,100,400,900\n\
         Battery electric,Private,200,300,600\n\
         Plug-in hybrid (petrol),Company,50,80,100\n\
         Plug-in hybrid (petrol),Private,[x],60,100\n\
         Diesel,Company,5000,5000,5000\n",
    )
    .unwrap();

    let summary = trends::pipeline::run(&input, &dir).unwrap();

    // Four retained series over three periods each.
    assert_eq!(summary.rows.len(), 12);
    assert_eq!(summary.first_period.to_string(), "2015Q1");
    assert_eq!(summary.latest_period.to_string(), "2020Q4");

    // BEV/Company: 100 -> 900 = +800%.
    assert_eq!(summary.growth[0].pct_change, Some(800.0));
    // PHEV/Private starts censored, so its change is undefined.
    assert_eq!(summary.growth[3].pct_change, None);

    // Latest quarter: company = 900 + 100, total = 1700.
    assert_eq!(summary.company_share_pct, Some(58.82));

    assert!(dir.join("cleaned_ev_timeseries.csv").exists());
    assert!(dir.join("report.txt").exists());

    let report = fs::read_to_string(dir.join("report.txt")).unwrap();
    assert!(report.contains("Period covered: 2015Q1 to 2020Q4"));
    assert!(report.contains("- Battery Electric (Company): 100 → 900 vehicles (800.00%)"));
    assert!(report.contains("(n/a)"));

    fs::remove_dir_all(&dir).unwrap();
}
