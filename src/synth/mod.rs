//! Synthetic used-EV listings generator.
//!
//! Produces a randomized-but-reproducible listings dataset for exercising
//! the residual value pipeline: price decays exponentially with age, minus a
//! mileage penalty, plus multiplicative noise, floored so old vehicles never
//! list implausibly low. The same seed yields a byte-identical file.

use std::fs;
use std::path::Path;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use crate::output;

/// Default RNG seed. Injectable so tests and reruns can vary the draw.
pub const DEFAULT_SEED: u64 = 42;

/// Default number of listings drawn per catalog model.
pub const DEFAULT_LISTINGS_PER_MODEL: usize = 140;

const MODEL_YEAR_MIN: i32 = 2016;
const MODEL_YEAR_MAX: i32 = 2024;
const REFERENCE_YEAR: i32 = 2025;

const ANNUAL_MILES_MEAN: f64 = 11_000.0;
const ANNUAL_MILES_STDDEV: f64 = 3_000.0;
const ANNUAL_MILES_MIN: f64 = 5_000.0;
const ANNUAL_MILES_MAX: f64 = 25_000.0;

/// Pounds knocked off per 1000 miles on the clock.
const MILEAGE_PENALTY_PER_1K: f64 = 1.5;
/// Multiplicative noise standard deviation, as a fraction of base price.
const NOISE_STDDEV: f64 = 0.05;
/// No listing goes below this price.
const PRICE_FLOOR: f64 = 2_500.0;

/// Catalog entry: a model with its new price and annual decay rate.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub make: &'static str,
    pub model: &'static str,
    pub new_price: f64,
    pub decay_per_year: f64,
}

/// Fleet mix commonly seen in UK leasing portfolios.
pub const CATALOG: [CatalogEntry; 8] = [
    CatalogEntry { make: "Tesla", model: "Model 3", new_price: 42_000.0, decay_per_year: 0.18 },
    CatalogEntry { make: "Tesla", model: "Model Y", new_price: 47_000.0, decay_per_year: 0.17 },
    CatalogEntry { make: "Nissan", model: "Leaf", new_price: 30_000.0, decay_per_year: 0.20 },
    CatalogEntry { make: "BMW", model: "i3", new_price: 36_000.0, decay_per_year: 0.19 },
    CatalogEntry { make: "Hyundai", model: "Kona Electric", new_price: 34_000.0, decay_per_year: 0.18 },
    CatalogEntry { make: "Kia", model: "e-Niro", new_price: 36_000.0, decay_per_year: 0.18 },
    CatalogEntry { make: "VW", model: "ID.3", new_price: 36_000.0, decay_per_year: 0.18 },
    CatalogEntry { make: "Renault", model: "Zoe", new_price: 26_000.0, decay_per_year: 0.21 },
];

/// One generated listing row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntheticListing {
    #[serde(rename = "Make")]
    pub make: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Mileage")]
    pub mileage: u64,
    #[serde(rename = "AskingPrice")]
    pub asking_price: f64,
}

/// Draws `per_model` listings for every catalog model, then shuffles the
/// rows. Fully determined by `seed`.
pub fn generate(per_model: usize, seed: u64) -> Result<Vec<SyntheticListing>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let annual_miles = Normal::new(ANNUAL_MILES_MEAN, ANNUAL_MILES_STDDEV)?;
    let noise = Normal::new(0.0, NOISE_STDDEV)?;

    let mut rows = Vec::with_capacity(per_model * CATALOG.len());
    for entry in CATALOG {
        for _ in 0..per_model {
            let year = rng.gen_range(MODEL_YEAR_MIN..=MODEL_YEAR_MAX);
            let age = (REFERENCE_YEAR - year) as f64;

            let annual = annual_miles
                .sample(&mut rng)
                .clamp(ANNUAL_MILES_MIN, ANNUAL_MILES_MAX);
            let mileage = (annual * age.max(0.5)) as u64;

            let base = entry.new_price * (-entry.decay_per_year * age).exp();
            let penalty = MILEAGE_PENALTY_PER_1K * (mileage as f64 / 1000.0);
            let price = (base - penalty + noise.sample(&mut rng) * base).max(PRICE_FLOOR);

            rows.push(SyntheticListing {
                make: entry.make.to_string(),
                model: entry.model.to_string(),
                year,
                mileage,
                asking_price: price.round(),
            });
        }
    }

    rows.shuffle(&mut rng);
    Ok(rows)
}

/// Writes generated listings as CSV, creating parent directories as needed.
pub fn write_listings(path: &Path, rows: &[SyntheticListing]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    output::write_csv(path, rows)
}
