//! Summary tables produced by the aggregation pipeline.
//!
//! Every row type is flat so it serializes to both CSV and JSON.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::records::Grade;

/// The five score statistics reported at every granularity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub avg_math_score: f64,
    pub avg_reading_score: f64,
    pub pct_passing_math: f64,
    pub pct_passing_reading: f64,
    /// Mean of the two passing percentages.
    pub overall_passing_rate: f64,
}

/// Single-row summary of the whole district.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictSummary {
    pub total_schools: usize,
    pub total_students: usize,
    pub total_budget: f64,
    pub avg_math_score: f64,
    pub avg_reading_score: f64,
    pub pct_passing_math: f64,
    pub pct_passing_reading: f64,
    pub overall_passing_rate: f64,
}

/// One row per school, keyed by school name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolSummary {
    pub school_name: String,
    pub school_type: String,
    /// Enrollment as recorded in the school source.
    pub size: u64,
    /// Student rows that joined to this school.
    pub student_count: usize,
    pub total_budget: f64,
    pub per_student_budget: f64,
    pub avg_math_score: f64,
    pub avg_reading_score: f64,
    pub pct_passing_math: f64,
    pub pct_passing_reading: f64,
    pub overall_passing_rate: f64,
}

/// Average scores per grade for one school. `None` means the school has no
/// students in that grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeScores {
    pub school_name: String,
    #[serde(serialize_with = "no_data")]
    pub math_9th: Option<f64>,
    #[serde(serialize_with = "no_data")]
    pub reading_9th: Option<f64>,
    #[serde(serialize_with = "no_data")]
    pub math_10th: Option<f64>,
    #[serde(serialize_with = "no_data")]
    pub reading_10th: Option<f64>,
    #[serde(serialize_with = "no_data")]
    pub math_11th: Option<f64>,
    #[serde(serialize_with = "no_data")]
    pub reading_11th: Option<f64>,
    #[serde(serialize_with = "no_data")]
    pub math_12th: Option<f64>,
    #[serde(serialize_with = "no_data")]
    pub reading_12th: Option<f64>,
}

impl GradeScores {
    pub fn new(school_name: &str) -> Self {
        Self {
            school_name: school_name.to_string(),
            math_9th: None,
            reading_9th: None,
            math_10th: None,
            reading_10th: None,
            math_11th: None,
            reading_11th: None,
            math_12th: None,
            reading_12th: None,
        }
    }

    /// `(math, reading)` averages for `grade`.
    pub fn get(&self, grade: Grade) -> (Option<f64>, Option<f64>) {
        match grade {
            Grade::Ninth => (self.math_9th, self.reading_9th),
            Grade::Tenth => (self.math_10th, self.reading_10th),
            Grade::Eleventh => (self.math_11th, self.reading_11th),
            Grade::Twelfth => (self.math_12th, self.reading_12th),
        }
    }

    pub fn set(&mut self, grade: Grade, math: Option<f64>, reading: Option<f64>) {
        let (m, r) = match grade {
            Grade::Ninth => (&mut self.math_9th, &mut self.reading_9th),
            Grade::Tenth => (&mut self.math_10th, &mut self.reading_10th),
            Grade::Eleventh => (&mut self.math_11th, &mut self.reading_11th),
            Grade::Twelfth => (&mut self.math_12th, &mut self.reading_12th),
        };
        *m = math;
        *r = reading;
    }
}

pub const NO_DATA: &str = "no data";

fn no_data<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_f64(*v),
        None => serializer.serialize_str(NO_DATA),
    }
}

/// Mean school-level statistics over the schools in one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketSummary {
    pub bucket: String,
    pub school_count: usize,
    pub avg_math_score: f64,
    pub avg_reading_score: f64,
    pub pct_passing_math: f64,
    pub pct_passing_reading: f64,
    pub overall_passing_rate: f64,
}

/// Every table one analysis run produces.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub district: DistrictSummary,
    pub schools: Vec<SchoolSummary>,
    pub top_schools: Vec<SchoolSummary>,
    pub bottom_schools: Vec<SchoolSummary>,
    pub scores_by_grade: Vec<GradeScores>,
    pub scores_by_spending: Vec<BucketSummary>,
    pub scores_by_size: Vec<BucketSummary>,
    pub scores_by_type: Vec<BucketSummary>,
}
