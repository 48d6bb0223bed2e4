//! Ordering schools by overall passing rate.
//!
//! There is exactly one ranking: passing rate descending, ties broken by
//! school name ascending. The bottom of the table is that same ranking read
//! from the end, so top-N and bottom-N never disagree about tied schools.

use std::cmp::Ordering;

use crate::analyzers::types::SchoolSummary;

fn rank_cmp(a: &SchoolSummary, b: &SchoolSummary) -> Ordering {
    b.overall_passing_rate
        .total_cmp(&a.overall_passing_rate)
        .then_with(|| a.school_name.cmp(&b.school_name))
}

/// All schools, best first.
pub fn ranked(summaries: &[SchoolSummary]) -> Vec<SchoolSummary> {
    let mut ranked = summaries.to_vec();
    ranked.sort_by(rank_cmp);
    ranked
}

/// The `n` schools with the highest overall passing rate, best first.
pub fn top_schools(summaries: &[SchoolSummary], n: usize) -> Vec<SchoolSummary> {
    ranked(summaries).into_iter().take(n).collect()
}

/// The `n` schools with the lowest overall passing rate, worst first.
pub fn bottom_schools(summaries: &[SchoolSummary], n: usize) -> Vec<SchoolSummary> {
    ranked(summaries).into_iter().rev().take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn summary(name: &str, rate: f64) -> SchoolSummary {
        SchoolSummary {
            school_name: name.to_string(),
            school_type: "District".to_string(),
            size: 100,
            student_count: 100,
            total_budget: 60000.0,
            per_student_budget: 600.0,
            avg_math_score: 75.0,
            avg_reading_score: 80.0,
            pct_passing_math: rate,
            pct_passing_reading: rate,
            overall_passing_rate: rate,
        }
    }

    fn names(rows: &[SchoolSummary]) -> Vec<&str> {
        rows.iter().map(|s| s.school_name.as_str()).collect()
    }

    fn sample() -> Vec<SchoolSummary> {
        vec![
            summary("Cabrera", 91.3),
            summary("Bailey", 54.6),
            summary("Thomas", 95.2),
            summary("Rodriguez", 52.9),
            summary("Griffin", 95.3),
            summary("Wilson", 90.0),
            summary("Pena", 93.9),
        ]
    }

    #[test]
    fn test_top_five() {
        let top = top_schools(&sample(), 5);
        assert_eq!(names(&top), vec!["Griffin", "Thomas", "Pena", "Cabrera", "Wilson"]);
    }

    #[test]
    fn test_bottom_five() {
        let bottom = bottom_schools(&sample(), 5);
        assert_eq!(
            names(&bottom),
            vec!["Rodriguez", "Bailey", "Wilson", "Cabrera", "Pena"]
        );
    }

    #[test]
    fn test_ties_break_on_name() {
        let rows = vec![summary("Zeta", 80.0), summary("Alpha", 80.0), summary("Mid", 80.0)];
        assert_eq!(names(&top_schools(&rows, 3)), vec!["Alpha", "Mid", "Zeta"]);
        assert_eq!(names(&bottom_schools(&rows, 3)), vec!["Zeta", "Mid", "Alpha"]);
    }

    #[test]
    fn test_bottom_is_reverse_of_top_over_all_schools() {
        let rows = sample();
        let n = rows.len();
        let mut top = top_schools(&rows, n);
        top.reverse();
        assert_eq!(bottom_schools(&rows, n), top);
    }

    #[test]
    fn test_n_larger_than_table() {
        assert_eq!(top_schools(&sample(), 50).len(), 7);
        assert!(bottom_schools(&[], 5).is_empty());
    }
}
