use tracing::info;

use crate::analyzers::join::join;
use crate::analyzers::types::DistrictSummary;
use crate::analyzers::utility::ScoreAccumulator;
use crate::error::{AnalysisError, Result};
use crate::records::{SchoolRecord, StudentRecord};

/// Computes the single-row district summary.
///
/// Each school's budget counts once, however many students it has.
///
/// # Errors
///
/// [`AnalysisError::EmptyInput`] if either source is empty, and
/// [`AnalysisError::Referential`] if a student names an unknown school.
#[tracing::instrument(skip_all, fields(schools = schools.len(), students = students.len()))]
pub fn district_summary(
    schools: &[SchoolRecord],
    students: &[StudentRecord],
) -> Result<DistrictSummary> {
    if schools.is_empty() {
        return Err(AnalysisError::EmptyInput("schools"));
    }
    if students.is_empty() {
        return Err(AnalysisError::EmptyInput("students"));
    }

    let rows = join(schools, students)?;

    let mut acc = ScoreAccumulator::default();
    for row in &rows {
        acc.push(row.student);
    }
    let scores = acc.finish("district")?;

    let summary = DistrictSummary {
        total_schools: schools.len(),
        total_students: rows.len(),
        total_budget: schools.iter().map(|s| s.budget).sum(),
        avg_math_score: scores.avg_math_score,
        avg_reading_score: scores.avg_reading_score,
        pct_passing_math: scores.pct_passing_math,
        pct_passing_reading: scores.pct_passing_reading,
        overall_passing_rate: scores.overall_passing_rate,
    };

    info!(
        total_schools = summary.total_schools,
        total_students = summary.total_students,
        overall_passing_rate = summary.overall_passing_rate,
        "District summary computed"
    );
    Ok(summary)
}
