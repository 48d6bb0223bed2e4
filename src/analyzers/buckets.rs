//! Grouping per-school summaries into labeled buckets.
//!
//! Numeric bins are right-inclusive: the first bin is `[e0, e1]`, every later
//! bin is `(e_i, e_i+1]`. A school whose metric equals an interior edge lands
//! in the lower bin.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

use crate::analyzers::types::{BucketSummary, SchoolSummary};
use crate::analyzers::utility::{mean, overall_passing_rate};
use crate::error::{AnalysisError, Result};

/// Bin edges plus one label per bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinSpec {
    pub edges: Vec<f64>,
    pub labels: Vec<String>,
}

impl BinSpec {
    /// # Errors
    ///
    /// [`AnalysisError::InvalidBins`] unless there are at least two finite,
    /// strictly increasing edges and exactly one label per bin.
    pub fn validate(&self) -> Result<()> {
        if self.edges.len() < 2 {
            return Err(AnalysisError::InvalidBins(
                "at least two edges are required".to_string(),
            ));
        }
        if self.labels.len() != self.edges.len() - 1 {
            return Err(AnalysisError::InvalidBins(format!(
                "{} edges need {} labels, got {}",
                self.edges.len(),
                self.edges.len() - 1,
                self.labels.len()
            )));
        }
        if self.edges.iter().any(|e| !e.is_finite()) {
            return Err(AnalysisError::InvalidBins("edges must be finite".to_string()));
        }
        if self.edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(AnalysisError::InvalidBins(
                "edges must be strictly increasing".to_string(),
            ));
        }
        Ok(())
    }

    /// Index of the bin holding `value`, if any.
    pub fn bin_of(&self, value: f64) -> Option<usize> {
        let first = *self.edges.first()?;
        if value < first {
            return None;
        }
        self.edges
            .windows(2)
            .enumerate()
            .find(|(i, w)| {
                let above_low = if *i == 0 { value >= w[0] } else { value > w[0] };
                above_low && value <= w[1]
            })
            .map(|(i, _)| i)
    }
}

/// The metric schools are partitioned on.
#[derive(Debug, Clone, Copy)]
pub enum Dimension<'a> {
    Spending(&'a BinSpec),
    Size(&'a BinSpec),
    SchoolType,
}

impl fmt::Display for Dimension<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Spending(_) => f.write_str("spending per student"),
            Dimension::Size(_) => f.write_str("school size"),
            Dimension::SchoolType => f.write_str("school type"),
        }
    }
}

/// A bucket label with the schools assigned to it.
#[derive(Debug, Clone)]
pub struct Bucket<'a> {
    pub label: String,
    pub schools: Vec<&'a SchoolSummary>,
}

/// Assigns every school to exactly one bucket.
///
/// Numeric buckets come back in bin order, school types in label order.
/// Buckets that receive no school are left out.
///
/// # Errors
///
/// [`AnalysisError::InvalidBins`] for a malformed [`BinSpec`] and
/// [`AnalysisError::OutOfRange`] for a school outside every bin.
pub fn assign_buckets<'a>(
    summaries: &'a [SchoolSummary],
    dimension: Dimension<'_>,
) -> Result<Vec<Bucket<'a>>> {
    match dimension {
        Dimension::Spending(spec) => {
            assign_numeric(summaries, spec, dimension, |s| s.per_student_budget)
        }
        Dimension::Size(spec) => assign_numeric(summaries, spec, dimension, |s| s.size as f64),
        Dimension::SchoolType => {
            let mut groups: BTreeMap<&str, Vec<&SchoolSummary>> = BTreeMap::new();
            for summary in summaries {
                groups
                    .entry(summary.school_type.as_str())
                    .or_default()
                    .push(summary);
            }
            Ok(groups
                .into_iter()
                .map(|(label, schools)| Bucket {
                    label: label.to_string(),
                    schools,
                })
                .collect())
        }
    }
}

fn assign_numeric<'a>(
    summaries: &'a [SchoolSummary],
    spec: &BinSpec,
    dimension: Dimension<'_>,
    metric: impl Fn(&SchoolSummary) -> f64,
) -> Result<Vec<Bucket<'a>>> {
    spec.validate()?;

    let mut bins: Vec<Vec<&SchoolSummary>> = vec![Vec::new(); spec.labels.len()];
    for summary in summaries {
        let value = metric(summary);
        let index = spec
            .bin_of(value)
            .ok_or_else(|| AnalysisError::OutOfRange {
                dimension: dimension.to_string(),
                school_name: summary.school_name.clone(),
                value,
            })?;
        debug!(
            school = %summary.school_name,
            value,
            bucket = %spec.labels[index],
            "Bucket assigned"
        );
        bins[index].push(summary);
    }

    Ok(spec
        .labels
        .iter()
        .zip(bins)
        .filter(|(_, schools)| !schools.is_empty())
        .map(|(label, schools)| Bucket {
            label: label.clone(),
            schools,
        })
        .collect())
}

/// Mean of the school-level score statistics within each bucket.
///
/// # Errors
///
/// Same as [`assign_buckets`].
#[tracing::instrument(skip_all, fields(schools = summaries.len(), dimension = %dimension))]
pub fn bucket_summaries(
    summaries: &[SchoolSummary],
    dimension: Dimension<'_>,
) -> Result<Vec<BucketSummary>> {
    let buckets = assign_buckets(summaries, dimension)?;

    let mut rows = Vec::with_capacity(buckets.len());
    for bucket in buckets {
        let column = |f: fn(&SchoolSummary) -> f64| -> Result<f64> {
            let values: Vec<f64> = bucket.schools.iter().map(|s| f(s)).collect();
            mean(&values).ok_or_else(|| {
                AnalysisError::Division(format!("bucket '{}' has no schools", bucket.label))
            })
        };

        let pct_passing_math = column(|s| s.pct_passing_math)?;
        let pct_passing_reading = column(|s| s.pct_passing_reading)?;

        rows.push(BucketSummary {
            bucket: bucket.label.clone(),
            school_count: bucket.schools.len(),
            avg_math_score: column(|s| s.avg_math_score)?,
            avg_reading_score: column(|s| s.avg_reading_score)?,
            pct_passing_math,
            pct_passing_reading,
            overall_passing_rate: overall_passing_rate(pct_passing_math, pct_passing_reading),
        });
    }

    info!(buckets = rows.len(), "Bucketed summary computed");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use std::collections::HashSet;

    fn summary(
        name: &str,
        school_type: &str,
        size: u64,
        per_student: f64,
        rate: f64,
    ) -> SchoolSummary {
        SchoolSummary {
            school_name: name.to_string(),
            school_type: school_type.to_string(),
            size,
            student_count: size as usize,
            total_budget: per_student * size as f64,
            per_student_budget: per_student,
            avg_math_score: rate,
            avg_reading_score: rate,
            pct_passing_math: rate,
            pct_passing_reading: rate - 10.0,
            overall_passing_rate: rate - 5.0,
        }
    }

    fn sample() -> Vec<SchoolSummary> {
        vec![
            summary("Huang", "District", 2917, 655.0, 65.0),
            summary("Figueroa", "District", 2949, 639.0, 66.0),
            summary("Shelton", "Charter", 1761, 600.0, 94.0),
            summary("Holden", "Charter", 427, 581.0, 93.0),
            summary("Pena", "Charter", 962, 609.0, 94.0),
            summary("Wright", "Charter", 1800, 583.0, 93.0),
        ]
    }

    fn spec(edges: &[f64], labels: &[&str]) -> BinSpec {
        BinSpec {
            edges: edges.to_vec(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn test_edge_values_fall_in_lower_bin() {
        let spending = AnalysisConfig::default().spending_bins;
        assert_eq!(spending.bin_of(0.0), Some(0));
        assert_eq!(spending.bin_of(585.0), Some(0));
        assert_eq!(spending.bin_of(585.01), Some(1));
        assert_eq!(spending.bin_of(615.0), Some(1));
        assert_eq!(spending.bin_of(675.0), Some(3));
        assert_eq!(spending.bin_of(675.5), None);
        assert_eq!(spending.bin_of(-1.0), None);
    }

    #[test]
    fn test_spending_buckets() {
        let config = AnalysisConfig::default();
        let schools = sample();
        let rows = bucket_summaries(&schools, Dimension::Spending(&config.spending_bins)).unwrap();

        let labels: Vec<_> = rows.iter().map(|r| r.bucket.as_str()).collect();
        assert_eq!(labels, vec!["<$585", "$585-615", "$615-645", "$645-675"]);
        assert_eq!(rows[0].school_count, 2);
        assert_eq!(rows[0].avg_math_score, 93.0);
        assert_eq!(rows[1].school_count, 2);
        assert_eq!(rows[1].pct_passing_math, 94.0);
        assert_eq!(rows[1].pct_passing_reading, 84.0);
        assert_eq!(rows[1].overall_passing_rate, 89.0);
    }

    #[test]
    fn test_size_buckets() {
        let config = AnalysisConfig::default();
        let schools = sample();
        let rows = bucket_summaries(&schools, Dimension::Size(&config.size_bins)).unwrap();

        let counts: Vec<_> = rows.iter().map(|r| (r.bucket.as_str(), r.school_count)).collect();
        assert_eq!(
            counts,
            vec![
                ("Small (<1000)", 2),
                ("Medium (1000-2000)", 2),
                ("Large (2000-5000)", 2)
            ]
        );
        assert_eq!(rows[2].avg_reading_score, 65.5);
    }

    #[test]
    fn test_type_buckets() {
        let schools = sample();
        let rows = bucket_summaries(&schools, Dimension::SchoolType).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bucket, "Charter");
        assert_eq!(rows[0].school_count, 4);
        assert_eq!(rows[1].bucket, "District");
        assert_eq!(rows[1].avg_math_score, 65.5);
    }

    #[test]
    fn test_buckets_partition_every_school_once() {
        let config = AnalysisConfig::default();
        let schools = sample();

        for dimension in [
            Dimension::Spending(&config.spending_bins),
            Dimension::Size(&config.size_bins),
            Dimension::SchoolType,
        ] {
            let buckets = assign_buckets(&schools, dimension).unwrap();
            let assigned: Vec<&str> = buckets
                .iter()
                .flat_map(|b| b.schools.iter().map(|s| s.school_name.as_str()))
                .collect();
            let unique: HashSet<&str> = assigned.iter().copied().collect();

            assert_eq!(assigned.len(), schools.len(), "{dimension}");
            assert_eq!(unique.len(), schools.len(), "{dimension}");
        }
    }

    #[test]
    fn test_overall_rate_is_mean_of_bucket_pass_rates() {
        let schools = sample();
        for row in bucket_summaries(&schools, Dimension::SchoolType).unwrap() {
            assert_eq!(
                row.overall_passing_rate,
                (row.pct_passing_math + row.pct_passing_reading) / 2.0
            );
        }
    }

    #[test]
    fn test_out_of_range_school_is_error() {
        let schools = vec![summary("Rich", "Charter", 500, 700.0, 90.0)];
        let config = AnalysisConfig::default();

        match bucket_summaries(&schools, Dimension::Spending(&config.spending_bins)).unwrap_err() {
            AnalysisError::OutOfRange {
                dimension,
                school_name,
                value,
            } => {
                assert_eq!(dimension, "spending per student");
                assert_eq!(school_name, "Rich");
                assert_eq!(value, 700.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_bins_are_omitted() {
        let schools = vec![summary("Tiny", "Charter", 10, 500.0, 90.0)];
        let bins = spec(&[0.0, 100.0, 200.0], &["Small", "Big"]);
        let rows = bucket_summaries(&schools, Dimension::Size(&bins)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].bucket, "Small");
    }

    #[test]
    fn test_invalid_bins_are_rejected() {
        assert!(spec(&[0.0], &[]).validate().is_err());
        assert!(spec(&[0.0, 1.0], &["a", "b"]).validate().is_err());
        assert!(spec(&[0.0, 2.0, 1.0], &["a", "b"]).validate().is_err());
        assert!(spec(&[0.0, 1.0, 1.0], &["a", "b"]).validate().is_err());
        assert!(spec(&[0.0, f64::INFINITY], &["a"]).validate().is_err());
        assert!(spec(&[0.0, 1.0, 2.0], &["a", "b"]).validate().is_ok());
    }
}
