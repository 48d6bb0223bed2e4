//! Serialization of summary tables to CSV and JSON.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::Report;

/// Writes `rows` as CSV, header first, to any writer.
pub fn write_csv_to<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `rows` to a CSV file at `path`, replacing it if present.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV table");
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_csv_to(file, rows)
}

/// Writes `value` as pretty-printed JSON to `path`.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    debug!(path = %path.display(), "Writing JSON");
    let body = serde_json::to_vec_pretty(value)?;
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Prints `value` as pretty-printed JSON on stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints `rows` as CSV on stdout.
pub fn print_csv<T: Serialize>(rows: &[T]) -> Result<()> {
    write_csv_to(std::io::stdout().lock(), rows)
}

/// Writes one CSV per table plus the whole report as `report.json` into `dir`.
#[tracing::instrument(skip_all, fields(dir = %dir.display()))]
pub fn write_report(dir: &Path, report: &Report) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    write_csv(&dir.join("district_summary.csv"), std::slice::from_ref(&report.district))?;
    write_csv(&dir.join("school_summary.csv"), &report.schools)?;
    write_csv(&dir.join("top_schools.csv"), &report.top_schools)?;
    write_csv(&dir.join("bottom_schools.csv"), &report.bottom_schools)?;
    write_csv(&dir.join("scores_by_grade.csv"), &report.scores_by_grade)?;
    write_csv(&dir.join("scores_by_spending.csv"), &report.scores_by_spending)?;
    write_csv(&dir.join("scores_by_size.csv"), &report.scores_by_size)?;
    write_csv(&dir.join("scores_by_type.csv"), &report.scores_by_type)?;
    write_json(&dir.join("report.json"), report)?;

    info!("Report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::{BucketSummary, GradeScores};
    use crate::records::Grade;

    fn bucket(label: &str) -> BucketSummary {
        BucketSummary {
            bucket: label.to_string(),
            school_count: 2,
            avg_math_score: 80.0,
            avg_reading_score: 82.5,
            pct_passing_math: 90.0,
            pct_passing_reading: 70.0,
            overall_passing_rate: 80.0,
        }
    }

    #[test]
    fn test_write_csv_to_writes_header_once() {
        let mut buf = Vec::new();
        write_csv_to(&mut buf, &[bucket("Small"), bucket("Large")]).unwrap();

        let content = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("bucket,school_count,avg_math_score"));
        assert!(lines[1].starts_with("Small,2,80"));
    }

    #[test]
    fn test_grade_scores_csv_marks_missing_grades() {
        let mut row = GradeScores::new("Huang");
        row.set(Grade::Ninth, Some(77.5), Some(81.0));

        let mut buf = Vec::new();
        write_csv_to(&mut buf, &[row]).unwrap();

        let content = String::from_utf8(buf).unwrap();
        let data = content.lines().nth(1).unwrap();
        assert!(data.starts_with("Huang,77.5,81"));
        assert!(data.ends_with("no data,no data"));
    }

    #[test]
    fn test_write_csv_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buckets.csv");

        write_csv(&path, &[bucket("Small")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_write_json_round_trips_as_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bucket.json");

        write_json(&path, &bucket("Medium")).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["bucket"], "Medium");
        assert_eq!(value["school_count"], 2);
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&bucket("Small")).unwrap();
    }
}
