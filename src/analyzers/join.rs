use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::records::{JoinedRow, SchoolRecord, StudentRecord};

/// Checks that no two schools share a name, since the name is the join key.
///
/// # Errors
///
/// Returns [`AnalysisError::Schema`] naming the first repeated school.
pub fn ensure_unique_schools(schools: &[SchoolRecord]) -> Result<()> {
    let mut seen = HashSet::new();
    for school in schools {
        if !seen.insert(school.school_name.as_str()) {
            return Err(AnalysisError::schema(
                "schools",
                format!("duplicate school name '{}'", school.school_name),
            ));
        }
    }
    Ok(())
}

/// Joins every student to its school by name, one row per student in input
/// order.
///
/// # Errors
///
/// Returns [`AnalysisError::Schema`] if two schools share a name and
/// [`AnalysisError::Referential`] for the first student whose school is not
/// in `schools`.
pub fn join<'a>(
    schools: &'a [SchoolRecord],
    students: &'a [StudentRecord],
) -> Result<Vec<JoinedRow<'a>>> {
    ensure_unique_schools(schools)?;

    let by_name: HashMap<&str, &SchoolRecord> = schools
        .iter()
        .map(|s| (s.school_name.as_str(), s))
        .collect();

    let rows = students
        .iter()
        .map(|student| {
            let school = by_name
                .get(student.school_name.as_str())
                .copied()
                .ok_or_else(|| AnalysisError::Referential {
                    student_id: student.student_id,
                    school_name: student.school_name.clone(),
                })?;
            Ok(JoinedRow { student, school })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(rows = rows.len(), schools = schools.len(), "Joined students to schools");
    Ok(rows)
}
