//! Header inspection for the wide licensing CSV.
//!
//! The source table carries one column per quarter (`2015 Q1`, `2015 Q2`,
//! ...) next to the categorical columns. Quarter columns are detected by a
//! strict whole-header match first, then by substring search as a fallback
//! for decorated headers.

use std::sync::LazyLock;

use anyhow::{Result, bail};
use csv::StringRecord;
use regex::Regex;

use crate::trends::period::{Quarter, parse_quarter_label};

static STRICT_QUARTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(20\d{2})\s*Q([1-4])\s*$").unwrap());
static LOOSE_QUARTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"20\d{2}\s*Q[1-4]").unwrap());

/// Resolved column positions for one input file.
#[derive(Debug, Clone)]
pub struct HeaderLayout {
    pub fuel_idx: usize,
    pub keepership_idx: usize,
    /// Quarter columns in header order, paired with their parsed period.
    pub quarter_cols: Vec<(usize, Quarter)>,
}

/// Locates the required categorical columns and all quarter columns.
///
/// # Errors
///
/// Fails when no quarter column is found (even via the fallback search), or
/// when the `Fuel` or `Keepership` column is absent.
pub fn inspect_headers(headers: &StringRecord) -> Result<HeaderLayout> {
    let mut quarter_cols = collect_quarter_cols(headers, &STRICT_QUARTER_RE);
    if quarter_cols.is_empty() {
        quarter_cols = collect_quarter_cols(headers, &LOOSE_QUARTER_RE);
    }
    if quarter_cols.is_empty() {
        bail!("couldn't find quarter columns like '2015 Q1' in the header");
    }

    let Some(fuel_idx) = find_column(headers, "fuel") else {
        bail!("missing expected column 'Fuel'");
    };
    let Some(keepership_idx) = find_column(headers, "keepership") else {
        bail!("missing expected column 'Keepership'");
    };

    Ok(HeaderLayout {
        fuel_idx,
        keepership_idx,
        quarter_cols,
    })
}

fn collect_quarter_cols(headers: &StringRecord, pattern: &Regex) -> Vec<(usize, Quarter)> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, h)| pattern.is_match(h))
        .filter_map(|(idx, h)| parse_quarter_label(h).map(|q| (idx, q)))
        .collect()
}

/// Case-insensitive column lookup. Strips the UTF-8 BOM some spreadsheet
/// exports prepend to the first header.
fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| {
        h.trim()
            .trim_start_matches('\u{feff}')
            .eq_ignore_ascii_case(name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cols: &[&str]) -> StringRecord {
        StringRecord::from(cols.to_vec())
    }

    #[test]
    fn test_detects_strict_quarter_columns() {
        let h = headers(&["Fuel", "Keepership", "2015 Q1", "2015 Q2", "Total"]);
        let layout = inspect_headers(&h).unwrap();
        assert_eq!(layout.fuel_idx, 0);
        assert_eq!(layout.keepership_idx, 1);
        assert_eq!(
            layout.quarter_cols,
            vec![(2, Quarter::new(2015, 1)), (3, Quarter::new(2015, 2))]
        );
    }

    #[test]
    fn test_fallback_matches_decorated_headers() {
        let h = headers(&["Fuel", "Keepership", "Licensed 2017 Q3 (thousands)"]);
        let layout = inspect_headers(&h).unwrap();
        assert_eq!(layout.quarter_cols, vec![(2, Quarter::new(2017, 3))]);
    }

    #[test]
    fn test_no_quarter_columns_is_fatal() {
        let h = headers(&["Fuel", "Keepership", "Total"]);
        let err = inspect_headers(&h).unwrap_err();
        assert!(err.to_string().contains("quarter columns"));
    }

    #[test]
    fn test_missing_fuel_column_is_fatal() {
        let h = headers(&["FuelType", "Keepership", "2015 Q1"]);
        let err = inspect_headers(&h).unwrap_err();
        assert!(err.to_string().contains("Fuel"));
    }

    #[test]
    fn test_missing_keepership_column_is_fatal() {
        let h = headers(&["Fuel", "Owner", "2015 Q1"]);
        let err = inspect_headers(&h).unwrap_err();
        assert!(err.to_string().contains("Keepership"));
    }

    #[test]
    fn test_categorical_lookup_is_case_insensitive() {
        let h = headers(&["FUEL", "keepership", "2015 Q1"]);
        assert!(inspect_headers(&h).is_ok());
    }

    #[test]
    fn test_bom_prefix_is_stripped() {
        let h = headers(&["\u{feff}Fuel", "Keepership", "2015 Q1"]);
        assert!(inspect_headers(&h).is_ok());
    }
}
