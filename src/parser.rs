//! CSV decoding for the school and student sources.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::analyzers::join::ensure_unique_schools;
use crate::error::{AnalysisError, Result};
use crate::records::{SchoolRecord, StudentRecord};

pub const SCHOOL_COLUMNS: &[&str] = &["School ID", "school_name", "type", "size", "budget"];

pub const STUDENT_COLUMNS: &[&str] = &[
    "Student ID",
    "student_name",
    "grade",
    "school_name",
    "reading_score",
    "math_score",
];

/// Decodes the school source.
///
/// # Errors
///
/// Returns [`AnalysisError::Schema`] if a required column is missing, a value
/// does not parse, or two rows share a school name.
pub fn parse_schools(bytes: &[u8]) -> Result<Vec<SchoolRecord>> {
    let schools: Vec<SchoolRecord> = parse_table("schools", bytes, SCHOOL_COLUMNS)?;
    ensure_unique_schools(&schools)?;
    Ok(schools)
}

/// Decodes the student source.
///
/// # Errors
///
/// Returns [`AnalysisError::Schema`] if a required column is missing or a
/// value (including the grade label) does not parse.
pub fn parse_students(bytes: &[u8]) -> Result<Vec<StudentRecord>> {
    parse_table("students", bytes, STUDENT_COLUMNS)
}

fn parse_table<T: DeserializeOwned>(
    input: &str,
    bytes: &[u8],
    required: &[&str],
) -> Result<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(bytes);

    let headers = rdr
        .headers()
        .map_err(|e| AnalysisError::schema(input, e.to_string()))?
        .clone();

    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(AnalysisError::schema(
                input,
                format!("missing required column '{column}'"),
            ));
        }
    }

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: T = result.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or_default();
            AnalysisError::schema(input, format!("line {line}: {e}"))
        })?;
        rows.push(record);
    }

    debug!(input, rows = rows.len(), "Parsed CSV source");
    Ok(rows)
}
