//! School performance aggregation.
//!
//! This module joins students to their schools and derives the district,
//! per-school, per-grade, ranked and bucketed summary tables. Every function
//! is pure over the borrowed source rows.

pub mod analyzer;
pub mod buckets;
pub mod district;
pub mod grade;
pub mod join;
pub mod ranking;
pub mod school;
pub mod types;
pub mod utility;
