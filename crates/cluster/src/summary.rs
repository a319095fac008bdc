//! Cluster population summary produced by the clustering step.
//!
//! The file is a whitespace table whose first line is a header. Column 1
//! holds the number of frames assigned to each cluster, in cluster-id order
//! (dominant cluster first).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ClusterError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PopulationSummary {
    /// Frame count per cluster, index = cluster id.
    pub counts: Vec<u64>,
}

impl PopulationSummary {
    pub fn new(counts: Vec<u64>) -> Self {
        Self { counts }
    }

    pub fn load(path: &Path) -> Result<Self, ClusterError> {
        let text = fs::read_to_string(path).map_err(|source| ClusterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let summary = Self::parse(&text, &path.display().to_string())?;
        tracing::debug!(
            path = %path.display(),
            clusters = summary.counts.len(),
            total_frames = summary.total(),
            "summary_loaded"
        );
        Ok(summary)
    }

    pub fn parse(text: &str, source_name: &str) -> Result<Self, ClusterError> {
        let mut counts = Vec::new();
        for (line_idx, line) in text.lines().enumerate().skip(1) {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let token = trimmed.split_whitespace().nth(1).ok_or_else(|| {
                ClusterError::MissingCountColumn {
                    source_name: source_name.to_string(),
                    line: line_idx + 1,
                }
            })?;
            let count = token.parse::<u64>().map_err(|_| ClusterError::Parse {
                source_name: source_name.to_string(),
                line: line_idx + 1,
                column: 1,
                token: token.to_string(),
            })?;
            counts.push(count);
        }
        if counts.is_empty() {
            return Err(ClusterError::Empty {
                source_name: source_name.to_string(),
            });
        }
        Ok(Self { counts })
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
