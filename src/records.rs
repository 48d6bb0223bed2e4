//! Typed rows of the two source tables.

use serde::Deserialize;
use std::fmt;

/// One row of the school source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SchoolRecord {
    #[serde(rename = "School ID")]
    pub school_id: u64,
    pub school_name: String,
    #[serde(rename = "type")]
    pub school_type: String,
    /// Total enrolled students.
    pub size: u64,
    pub budget: f64,
}

/// One row of the student source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StudentRecord {
    #[serde(rename = "Student ID")]
    pub student_id: u64,
    pub student_name: String,
    #[serde(default)]
    pub gender: Option<String>,
    pub grade: Grade,
    pub school_name: String,
    pub reading_score: f64,
    pub math_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum Grade {
    #[serde(rename = "9th")]
    Ninth,
    #[serde(rename = "10th")]
    Tenth,
    #[serde(rename = "11th")]
    Eleventh,
    #[serde(rename = "12th")]
    Twelfth,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Ninth, Grade::Tenth, Grade::Eleventh, Grade::Twelfth];

    pub fn label(self) -> &'static str {
        match self {
            Grade::Ninth => "9th",
            Grade::Tenth => "10th",
            Grade::Eleventh => "11th",
            Grade::Twelfth => "12th",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A student joined with the school it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct JoinedRow<'a> {
    pub student: &'a StudentRecord,
    pub school: &'a SchoolRecord,
}

impl JoinedRow<'_> {
    pub fn school_name(&self) -> &str {
        &self.school.school_name
    }

    pub fn school_type(&self) -> &str {
        &self.school.school_type
    }

    pub fn budget(&self) -> f64 {
        self.school.budget
    }
}
