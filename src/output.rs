//! Output formatting and persistence shared by the pipelines.
//!
//! Supports pretty-printing, JSON summary logging, CSV tables, and text
//! reports.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes serializable rows to a CSV file, headers included.
pub fn write_csv<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV");

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes report lines to a text file, newline-joined.
pub fn write_text_report<P: AsRef<Path>>(path: P, lines: &[String]) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), lines = lines.len(), "Writing report");
    fs::write(path, lines.join("\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[derive(Debug, Serialize)]
    struct Row {
        name: &'static str,
        value: f64,
    }

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&Row { name: "a", value: 1.0 });
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&Row { name: "a", value: 1.0 }).unwrap();
    }

    #[test]
    fn test_write_csv_headers_and_rows() {
        let path = temp_path("ev_fleet_rv_test_write_csv.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        let rows = vec![
            Row { name: "a", value: 1.0 },
            Row { name: "b", value: 2.5 },
        ];
        write_csv(&path, &rows).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "name,value");
        assert_eq!(lines[1], "a,1.0");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_text_report_joins_lines() {
        let path = temp_path("ev_fleet_rv_test_report.txt");
        let _ = fs::remove_file(&path);

        write_text_report(&path, &["first".to_string(), "second".to_string()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond");

        fs::remove_file(&path).unwrap();
    }
}
