//! Category normalization and count coercion for dirty licensing data.

use std::fmt;

use serde::Serialize;

/// Fuel categories retained for analysis. Anything else is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FuelCategory {
    #[serde(rename = "Battery Electric")]
    BatteryElectric,
    #[serde(rename = "Plug-in Hybrid")]
    PluginHybrid,
}

impl fmt::Display for FuelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelCategory::BatteryElectric => write!(f, "Battery Electric"),
            FuelCategory::PluginHybrid => write!(f, "Plug-in Hybrid"),
        }
    }
}

/// Keepership categories retained for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Keepership {
    Company,
    Private,
}

impl fmt::Display for Keepership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keepership::Company => write!(f, "Company"),
            Keepership::Private => write!(f, "Private"),
        }
    }
}

/// Maps raw fuel text to a category. Matching is case-insensitive and
/// ignores surrounding whitespace; unrecognized text maps to `None`.
pub fn normalize_fuel(raw: &str) -> Option<FuelCategory> {
    let t = raw.trim().to_lowercase();
    if t.contains("battery") || t.contains("bev") {
        return Some(FuelCategory::BatteryElectric);
    }
    if t.contains("plug-in") || t.contains("plugin") || t.contains("phev") {
        return Some(FuelCategory::PluginHybrid);
    }
    None
}

/// Maps raw keepership text to a category, same contract as
/// [`normalize_fuel`].
pub fn normalize_keepership(raw: &str) -> Option<Keepership> {
    let t = raw.trim().to_lowercase();
    if t.contains("company") {
        return Some(Keepership::Company);
    }
    if t.contains("private") {
        return Some(Keepership::Private);
    }
    None
}

/// Markers the source statistics tables use for suppressed, withheld, or
/// zero-redacted counts.
const CENSORED_MARKERS: [&str; 3] = ["[c]", "[x]", "[z]"];

/// Coerces a raw count cell to a number.
///
/// Blank cells and censored markers coerce to 0.0, as does anything that
/// fails to parse as a finite number. A count cell never fails a row.
pub fn coerce_count(raw: &str) -> f64 {
    let t = raw.trim();
    if t.is_empty() || CENSORED_MARKERS.contains(&t) {
        return 0.0;
    }
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_fuel_variants() {
        assert_eq!(normalize_fuel("Battery Electric"), Some(FuelCategory::BatteryElectric));
        assert_eq!(normalize_fuel(" battery electric "), Some(FuelCategory::BatteryElectric));
        assert_eq!(normalize_fuel("BEV"), Some(FuelCategory::BatteryElectric));
        assert_eq!(normalize_fuel("Plug-in Hybrid Electric"), Some(FuelCategory::PluginHybrid));
        assert_eq!(normalize_fuel("PHEV"), Some(FuelCategory::PluginHybrid));
        assert_eq!(normalize_fuel("plugin hybrid"), Some(FuelCategory::PluginHybrid));
    }

    #[test]
    fn test_normalize_fuel_unmapped() {
        assert_eq!(normalize_fuel("Diesel"), None);
        assert_eq!(normalize_fuel(""), None);
    }

    #[test]
    fn test_normalize_keepership_variants() {
        assert_eq!(normalize_keepership("Company"), Some(Keepership::Company));
        assert_eq!(normalize_keepership("  COMPANY kept "), Some(Keepership::Company));
        assert_eq!(normalize_keepership("private"), Some(Keepership::Private));
        assert_eq!(normalize_keepership("Unknown"), None);
    }

    #[test]
    fn test_coerce_count_censored_markers() {
        assert_eq!(coerce_count("[c]"), 0.0);
        assert_eq!(coerce_count("[x]"), 0.0);
        assert_eq!(coerce_count(" [z] "), 0.0);
        assert_eq!(coerce_count(""), 0.0);
        assert_eq!(coerce_count("   "), 0.0);
    }

    #[test]
    fn test_coerce_count_numeric() {
        assert_eq!(coerce_count("1520"), 1520.0);
        assert_eq!(coerce_count(" 42.5 "), 42.5);
        assert_eq!(coerce_count("0"), 0.0);
    }

    #[test]
    fn test_coerce_count_junk_becomes_zero() {
        assert_eq!(coerce_count("n/a"), 0.0);
        assert_eq!(coerce_count("12,345"), 0.0);
        assert_eq!(coerce_count("inf"), 0.0);
        assert_eq!(coerce_count("NaN"), 0.0);
    }
}
