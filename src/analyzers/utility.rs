use crate::analyzers::types::ScoreSummary;
use crate::error::{AnalysisError, Result};
use crate::records::StudentRecord;

/// A score passes only when strictly above this value; exactly 70 fails.
pub const PASSING_SCORE: f64 = 70.0;

pub fn is_passing(score: f64) -> bool {
    score > PASSING_SCORE
}

/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Running sums for the score statistics of one group of students.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScoreAccumulator {
    pub count: usize,
    math_sum: f64,
    reading_sum: f64,
    passing_math: usize,
    passing_reading: usize,
}

impl ScoreAccumulator {
    pub fn push(&mut self, student: &StudentRecord) {
        self.count += 1;
        self.math_sum += student.math_score;
        self.reading_sum += student.reading_score;
        if is_passing(student.math_score) {
            self.passing_math += 1;
        }
        if is_passing(student.reading_score) {
            self.passing_reading += 1;
        }
    }

    /// Averages and pass rates for the group.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Division`] if no student was pushed; `group`
    /// names the group in the message.
    pub fn finish(&self, group: &str) -> Result<ScoreSummary> {
        if self.count == 0 {
            return Err(AnalysisError::Division(format!("no students in {group}")));
        }

        let n = self.count as f64;
        let pct_passing_math = self.passing_math as f64 / n * 100.0;
        let pct_passing_reading = self.passing_reading as f64 / n * 100.0;

        Ok(ScoreSummary {
            avg_math_score: self.math_sum / n,
            avg_reading_score: self.reading_sum / n,
            pct_passing_math,
            pct_passing_reading,
            overall_passing_rate: overall_passing_rate(pct_passing_math, pct_passing_reading),
        })
    }
}

pub fn overall_passing_rate(pct_passing_math: f64, pct_passing_reading: f64) -> f64 {
    (pct_passing_math + pct_passing_reading) / 2.0
}
