//! Identifier parsing for cluster files and frame labels.
//!
//! Cluster ids live in file names (`normed_clusttraj.c3`) and frame indices
//! live in mapping keys (`f12`). All extraction goes through here so a
//! malformed id always surfaces as [`ClusterError::MalformedId`].

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ClusterError;

static CLUSTER_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.c(\d+)$").expect("cluster suffix pattern"));
static FRAME_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^f(\d+)$").expect("frame pattern"));

/// Numeric cluster id; `0` is the dominant cluster.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterId(pub usize);

impl ClusterId {
    pub const DOMINANT: ClusterId = ClusterId(0);

    pub fn is_dominant(&self) -> bool {
        self.0 == 0
    }

    /// Extract the id from a cluster file name such as `normed_clusttraj.c12`.
    ///
    /// Only the file name is inspected, so digits in parent directories
    /// never leak into the id.
    pub fn from_path(path: &Path) -> Result<Self, ClusterError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ClusterError::MalformedId(path.display().to_string()))?;
        let caps = CLUSTER_SUFFIX
            .captures(name)
            .ok_or_else(|| ClusterError::MalformedId(name.to_string()))?;
        parse_digits(&caps[1], name).map(ClusterId)
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Mapping key for a dominant-cluster frame, rendered as `f{index}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameLabel(pub usize);

impl fmt::Display for FrameLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

impl FromStr for FrameLabel {
    type Err = ClusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = FRAME_LABEL
            .captures(s)
            .ok_or_else(|| ClusterError::MalformedId(s.to_string()))?;
        parse_digits(&caps[1], s).map(FrameLabel)
    }
}

fn parse_digits(digits: &str, whole: &str) -> Result<usize, ClusterError> {
    digits
        .parse::<usize>()
        .map_err(|_| ClusterError::MalformedId(whole.to_string()))
}
