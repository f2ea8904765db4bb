//! Calendar quarters parsed from wide-format column labels.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

static QUARTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(20\d{2})\s*Q([1-4])").unwrap());

/// A calendar quarter, ordered year-major so that `2015Q4 < 2016Q1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    pub year: i32,
    pub quarter: u8,
}

impl Quarter {
    pub fn new(year: i32, quarter: u8) -> Self {
        Quarter { year, quarter }
    }

    /// Position of this quarter on a continuous axis, for charting.
    pub fn axis_value(&self) -> f64 {
        self.year as f64 + (self.quarter as f64 - 1.0) * 0.25
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}

impl Serialize for Quarter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Extracts a quarter from a column label containing `YYYY Q#` anywhere in
/// the text. Returns `None` when no such token is present.
pub fn parse_quarter_label(label: &str) -> Option<Quarter> {
    let caps = QUARTER_RE.captures(label)?;
    let year = caps[1].parse().ok()?;
    let quarter = caps[2].parse().ok()?;
    Some(Quarter { year, quarter })
}
