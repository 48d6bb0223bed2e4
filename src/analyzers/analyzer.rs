use chrono::Utc;
use tracing::info;

use crate::analyzers::buckets::{Dimension, bucket_summaries};
use crate::analyzers::district::district_summary;
use crate::analyzers::grade::scores_by_grade;
use crate::analyzers::ranking::{bottom_schools, top_schools};
use crate::analyzers::school::school_summaries;
use crate::analyzers::types::Report;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::records::{SchoolRecord, StudentRecord};

/// Computes every summary table from the two sources.
///
/// The first failing table aborts the run; no partial report is returned.
#[tracing::instrument(skip_all, fields(schools = schools.len(), students = students.len()))]
pub fn analyze(
    schools: &[SchoolRecord],
    students: &[StudentRecord],
    config: &AnalysisConfig,
) -> Result<Report> {
    let district = district_summary(schools, students)?;
    let summaries = school_summaries(schools, students)?;
    let scores_by_grade = scores_by_grade(schools, students)?;

    let report = Report {
        generated_at: Utc::now(),
        district,
        top_schools: top_schools(&summaries, config.top_n),
        bottom_schools: bottom_schools(&summaries, config.top_n),
        scores_by_grade,
        scores_by_spending: bucket_summaries(
            &summaries,
            Dimension::Spending(&config.spending_bins),
        )?,
        scores_by_size: bucket_summaries(&summaries, Dimension::Size(&config.size_bins))?,
        scores_by_type: bucket_summaries(&summaries, Dimension::SchoolType)?,
        schools: summaries,
    };

    info!(
        schools = report.schools.len(),
        students = report.district.total_students,
        "Analysis complete"
    );
    Ok(report)
}
