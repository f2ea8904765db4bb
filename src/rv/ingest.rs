//! Listings CSV ingest and row-level cleaning.
//!
//! Structural problems (missing file, missing required column) are fatal.
//! Row-level problems (unparsable year, junk price) drop the row and keep
//! going; the pipelines are built for dirty real-world listings data.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::rv::types::{CleanListing, MileageBucket};

/// Columns the listings CSV must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = ["Make", "Model", "Year", "Mileage", "AskingPrice"];

/// Year against which vehicle age is derived from the model year.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2025;

/// Ingest output: cleaned listings plus row accounting.
#[derive(Debug)]
pub struct IngestedListings {
    pub listings: Vec<CleanListing>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

/// Loads and cleans a listings CSV.
///
/// # Errors
///
/// Fails when the file cannot be opened or a required column is missing.
pub fn load_listings(path: &Path, reference_year: i32) -> Result<IngestedListings> {
    let file = File::open(path)
        .with_context(|| format!("failed to open listings CSV '{}'", path.display()))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .context("failed to read listings CSV headers")?
        .clone();

    let header_map: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim_start_matches('\u{feff}'), idx))
        .collect();

    for column in REQUIRED_COLUMNS {
        if !header_map.contains_key(column) {
            bail!("missing column: {column}");
        }
    }

    let make_idx = header_map["Make"];
    let model_idx = header_map["Model"];
    let year_idx = header_map["Year"];
    let mileage_idx = header_map["Mileage"];
    let price_idx = header_map["AskingPrice"];

    let mut listings = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_dropped = 0usize;

    for result in reader.records() {
        rows_read += 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "Dropping unreadable CSV record");
                rows_dropped += 1;
                continue;
            }
        };

        let make = record.get(make_idx).unwrap_or("").trim();
        let model = record.get(model_idx).unwrap_or("").trim();
        let year = record.get(year_idx).and_then(parse_year);
        let price = record.get(price_idx).and_then(clean_price);
        let mileage_raw = record.get(mileage_idx).unwrap_or("");

        let (Some(year), Some(price)) = (year, price) else {
            rows_dropped += 1;
            continue;
        };
        if make.is_empty() || model.is_empty() {
            rows_dropped += 1;
            continue;
        }

        listings.push(CleanListing {
            make: make.to_string(),
            model: model.to_string(),
            age_years: estimate_age_years(year, reference_year),
            mileage: mileage_raw.parse::<f64>().ok().filter(|m| m.is_finite()),
            mileage_bucket: mileage_bucket(mileage_raw),
            price,
        });
    }

    info!(
        rows_read,
        rows_dropped,
        rows_used = listings.len(),
        "Listings cleaned"
    );

    Ok(IngestedListings {
        listings,
        rows_read,
        rows_dropped,
    })
}

/// Parses a model year, tolerating float-formatted cells like `2019.0`.
fn parse_year(raw: &str) -> Option<i32> {
    let v = raw.trim().parse::<f64>().ok()?;
    if !v.is_finite() {
        return None;
    }
    Some(v as i32)
}

/// Vehicle age in years at the reference year, clamped at zero.
pub fn estimate_age_years(year: i32, reference_year: i32) -> f64 {
    (reference_year - year).max(0) as f64
}

/// Strips currency symbols and thousands separators, then parses. Returns
/// `None` for blanks, junk, and non-positive prices.
fn clean_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '£' | '$' | ','))
        .collect();
    let v = cleaned.trim().parse::<f64>().ok()?;
    if v.is_finite() && v > 0.0 { Some(v) } else { None }
}

/// Buckets a raw mileage cell. Unparsable cells land in `Unknown`.
pub fn mileage_bucket(raw: &str) -> MileageBucket {
    let Ok(m) = raw.trim().parse::<f64>() else {
        return MileageBucket::Unknown;
    };
    if !m.is_finite() {
        return MileageBucket::Unknown;
    }
    if m < 10_000.0 {
        MileageBucket::UpTo10k
    } else if m < 20_000.0 {
        MileageBucket::To20k
    } else if m < 40_000.0 {
        MileageBucket::To40k
    } else if m < 60_000.0 {
        MileageBucket::To60k
    } else {
        MileageBucket::Over60k
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn write_temp_csv(name: &str, content: &str) -> PathBuf {
        let path = env::temp_dir().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_year_variants() {
        assert_eq!(parse_year("2019"), Some(2019));
        assert_eq!(parse_year("2019.0"), Some(2019));
        assert_eq!(parse_year("new"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn test_age_is_clamped_at_zero() {
        assert_eq!(estimate_age_years(2020, 2025), 5.0);
        assert_eq!(estimate_age_years(2030, 2025), 0.0);
    }

    #[test]
    fn test_clean_price_strips_currency_markers() {
        assert_eq!(clean_price("£23,500"), Some(23_500.0));
        assert_eq!(clean_price("$9000"), Some(9_000.0));
        assert_eq!(clean_price(" 12500.50 "), Some(12_500.50));
    }

    #[test]
    fn test_clean_price_rejects_junk_and_non_positive() {
        assert_eq!(clean_price("POA"), None);
        assert_eq!(clean_price("0"), None);
        assert_eq!(clean_price("-100"), None);
        assert_eq!(clean_price(""), None);
    }

    #[test]
    fn test_mileage_bucket_boundaries() {
        assert_eq!(mileage_bucket("9999"), MileageBucket::UpTo10k);
        assert_eq!(mileage_bucket("10000"), MileageBucket::To20k);
        assert_eq!(mileage_bucket("19999.9"), MileageBucket::To20k);
        assert_eq!(mileage_bucket("20000"), MileageBucket::To40k);
        assert_eq!(mileage_bucket("40000"), MileageBucket::To60k);
        assert_eq!(mileage_bucket("60000"), MileageBucket::Over60k);
        assert_eq!(mileage_bucket("lots"), MileageBucket::Unknown);
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let path = write_temp_csv(
            "ev_fleet_rv_test_missing_col.csv",
            "Make,Model,Year,Mileage\nTesla,Model 3,2020,30000\n",
        );
        let err = load_listings(&path, DEFAULT_REFERENCE_YEAR).unwrap_err();
        assert!(err.to_string().contains("AskingPrice"));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_bad_rows_are_dropped_not_fatal() {
        let path = write_temp_csv(
            "ev_fleet_rv_test_dirty_rows.csv",
            "Make,Model,Year,Mileage,AskingPrice\n\
             Tesla,Model 3,2020,30000,£25000\n\
             Tesla,Model 3,unknown,30000,25000\n\
             Tesla,Model 3,2021,30000,free\n\
             ,Model 3,2021,30000,25000\n",
        );
        let ingested = load_listings(&path, DEFAULT_REFERENCE_YEAR).unwrap();
        assert_eq!(ingested.rows_read, 4);
        assert_eq!(ingested.rows_dropped, 3);
        assert_eq!(ingested.listings.len(), 1);
        assert_eq!(ingested.listings[0].age_years, 5.0);
        assert_eq!(ingested.listings[0].price, 25_000.0);
        fs::remove_file(&path).unwrap();
    }
}
