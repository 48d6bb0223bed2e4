//! Error types raised by parsing and aggregation.
//!
//! Library code returns [`AnalysisError`]; the binary wraps everything in
//! `anyhow` for presentation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A required column is missing or a value has the wrong type.
    #[error("schema error in {input}: {message}")]
    Schema { input: String, message: String },

    /// A student row names a school that is absent from the school source.
    #[error("student {student_id} references unknown school '{school_name}'")]
    Referential { student_id: u64, school_name: String },

    /// An aggregate would divide by a zero-sized group.
    #[error("division by zero: {0}")]
    Division(String),

    #[error("{dimension} value {value} for '{school_name}' falls outside every configured bin")]
    OutOfRange {
        dimension: String,
        school_name: String,
        value: f64,
    },

    #[error("{0} source is empty")]
    EmptyInput(&'static str),

    #[error("invalid bin configuration: {0}")]
    InvalidBins(String),
}

impl AnalysisError {
    pub(crate) fn schema(input: &str, message: impl Into<String>) -> Self {
        AnalysisError::Schema {
            input: input.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
