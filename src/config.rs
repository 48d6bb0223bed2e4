//! Analysis configuration: bucket boundaries and ranking depth.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analyzers::buckets::BinSpec;

/// Tunables for a single analysis run.
///
/// Stored as a JSON object on disk; any key left out keeps its default:
/// ```json
/// {
///   "spending_bins": { "edges": [0, 600, 650], "labels": ["Low", "High"] },
///   "top_n": 3
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub spending_bins: BinSpec,
    pub size_bins: BinSpec,
    pub top_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            spending_bins: BinSpec {
                edges: vec![0.0, 585.0, 615.0, 645.0, 675.0],
                labels: vec![
                    "<$585".to_string(),
                    "$585-615".to_string(),
                    "$615-645".to_string(),
                    "$645-675".to_string(),
                ],
            },
            size_bins: BinSpec {
                edges: vec![0.0, 1000.0, 2000.0, 5000.0],
                labels: vec![
                    "Small (<1000)".to_string(),
                    "Medium (1000-2000)".to_string(),
                    "Large (2000-5000)".to_string(),
                ],
            },
            top_n: 5,
        }
    }
}

impl AnalysisConfig {
    /// Loads the config from a JSON file at `path` and validates both bin sets.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("failed to read '{path}'"))?;
        let config: AnalysisConfig = serde_json::from_str(&content)
            .with_context(|| format!("invalid analysis config '{path}'"))?;
        config.spending_bins.validate()?;
        config.size_bins.validate()?;
        Ok(config)
    }

    /// Uses `path` when given, the defaults otherwise.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
