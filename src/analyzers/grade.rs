use std::collections::BTreeMap;
use tracing::info;

use crate::analyzers::join::join;
use crate::analyzers::types::GradeScores;
use crate::analyzers::utility::mean;
use crate::error::{AnalysisError, Result};
use crate::records::{Grade, SchoolRecord, StudentRecord};

#[derive(Default)]
struct Scores {
    math: Vec<f64>,
    reading: Vec<f64>,
}

/// Average math and reading score for each grade at each school.
///
/// Rows cover every school in `schools`, ordered by name. A grade with no
/// students at a school is reported as `None` rather than zero.
///
/// # Errors
///
/// [`AnalysisError::EmptyInput`] if either source is empty, and
/// [`AnalysisError::Referential`] if a student names an unknown school.
#[tracing::instrument(skip_all, fields(schools = schools.len(), students = students.len()))]
pub fn scores_by_grade(
    schools: &[SchoolRecord],
    students: &[StudentRecord],
) -> Result<Vec<GradeScores>> {
    if schools.is_empty() {
        return Err(AnalysisError::EmptyInput("schools"));
    }
    if students.is_empty() {
        return Err(AnalysisError::EmptyInput("students"));
    }

    let rows = join(schools, students)?;

    let mut cells: BTreeMap<(&str, Grade), Scores> = BTreeMap::new();
    for grade in Grade::ALL {
        for row in rows.iter().filter(|r| r.student.grade == grade) {
            let scores = cells
                .entry((row.school.school_name.as_str(), grade))
                .or_default();
            scores.math.push(row.student.math_score);
            scores.reading.push(row.student.reading_score);
        }
    }

    let mut names: Vec<&str> = schools.iter().map(|s| s.school_name.as_str()).collect();
    names.sort_unstable();

    let table: Vec<GradeScores> = names
        .into_iter()
        .map(|name| {
            let mut row = GradeScores::new(name);
            for grade in Grade::ALL {
                if let Some(scores) = cells.get(&(name, grade)) {
                    row.set(grade, mean(&scores.math), mean(&scores.reading));
                }
            }
            row
        })
        .collect();

    info!(schools = table.len(), "Scores by grade computed");
    Ok(table)
}
