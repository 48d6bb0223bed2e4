use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::analyzers::join::join;
use crate::analyzers::types::SchoolSummary;
use crate::analyzers::utility::ScoreAccumulator;
use crate::error::{AnalysisError, Result};
use crate::records::{SchoolRecord, StudentRecord};

/// Budget per enrolled student.
///
/// # Errors
///
/// [`AnalysisError::Division`] when the school's enrollment is zero.
pub fn per_student_budget(school: &SchoolRecord) -> Result<f64> {
    if school.size == 0 {
        return Err(AnalysisError::Division(format!(
            "school '{}' has zero enrollment",
            school.school_name
        )));
    }
    Ok(school.budget / school.size as f64)
}

/// Computes one summary row per school, ordered by school name.
///
/// Every school in `schools` gets a row, so every school needs at least one
/// student.
///
/// # Errors
///
/// - [`AnalysisError::EmptyInput`] if either source is empty.
/// - [`AnalysisError::Referential`] if a student names an unknown school.
/// - [`AnalysisError::Division`] for a school with zero enrollment or no
///   student rows.
#[tracing::instrument(skip_all, fields(schools = schools.len(), students = students.len()))]
pub fn school_summaries(
    schools: &[SchoolRecord],
    students: &[StudentRecord],
) -> Result<Vec<SchoolSummary>> {
    if schools.is_empty() {
        return Err(AnalysisError::EmptyInput("schools"));
    }
    if students.is_empty() {
        return Err(AnalysisError::EmptyInput("students"));
    }

    let rows = join(schools, students)?;

    let mut groups: BTreeMap<&str, (&SchoolRecord, ScoreAccumulator)> = schools
        .iter()
        .map(|s| (s.school_name.as_str(), (s, ScoreAccumulator::default())))
        .collect();
    for row in &rows {
        if let Some((_, acc)) = groups.get_mut(row.school.school_name.as_str()) {
            acc.push(row.student);
        }
    }

    let mut summaries = Vec::with_capacity(groups.len());
    for (name, (school, acc)) in &groups {
        let scores = acc.finish(&format!("school '{name}'"))?;

        summaries.push(SchoolSummary {
            school_name: school.school_name.clone(),
            school_type: school.school_type.clone(),
            size: school.size,
            student_count: acc.count,
            total_budget: school.budget,
            per_student_budget: per_student_budget(school)?,
            avg_math_score: scores.avg_math_score,
            avg_reading_score: scores.avg_reading_score,
            pct_passing_math: scores.pct_passing_math,
            pct_passing_reading: scores.pct_passing_reading,
            overall_passing_rate: scores.overall_passing_rate,
        });
        debug!(school = %name, students = acc.count, "School summarized");
    }

    info!(schools = summaries.len(), "Per-school summary computed");
    Ok(summaries)
}
