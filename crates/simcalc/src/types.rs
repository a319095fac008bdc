use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use cluster::ClusterError;
use esim::{validate_activation_threshold, EsimError, NAry, WeightScheme};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a dominant-cluster frame is compared against another cluster.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Mean pairwise similarity against every frame of the cluster.
    Pairwise,
    /// n-ary similarity of the frame joined with the whole cluster.
    Union,
    /// Pairwise similarity against the cluster medoid.
    Medoid,
    /// Pairwise similarity against the cluster outlier.
    Outlier,
}

impl Method {
    pub const ALL: [Method; 4] = [
        Method::Pairwise,
        Method::Union,
        Method::Medoid,
        Method::Outlier,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Pairwise => "pairwise",
            Method::Union => "union",
            Method::Medoid => "medoid",
            Method::Outlier => "outlier",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = SimCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| SimCalcError::UnknownMethod(s.to_string()))
    }
}

/// Parameters of a [`crate::SimilarityCalculator`].
///
/// Plain data: two calculators built from the same clusters and the same
/// config produce identical mappings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Similarity formula. Pairwise, medoid and outlier modes only accept
    /// `RR` and `SM`.
    pub n_ary: NAry,
    /// Weighted or non-weighted index denominators.
    pub weight: WeightScheme,
    /// Scale each cluster's values by its share of the population.
    pub frame_weighted_sim: bool,
    /// Number of clusters to analyze, dominant included. `None` means all.
    pub n_clusters: Option<usize>,
    /// Fraction of the dominant cluster to trim before comparing.
    pub trim_frac: Option<f64>,
    /// Values `>=` this cutoff count as active. `None` compares raw values.
    pub activation_threshold: Option<f64>,
    /// Compute clusters on the rayon pool.
    pub use_parallel: bool,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            n_ary: NAry::RR,
            weight: WeightScheme::NonWeighted,
            frame_weighted_sim: true,
            n_clusters: None,
            trim_frac: None,
            activation_threshold: None,
            use_parallel: false,
        }
    }
}

impl CalculatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_n_ary(mut self, n_ary: NAry) -> Self {
        self.n_ary = n_ary;
        self
    }

    pub fn with_weight(mut self, weight: WeightScheme) -> Self {
        self.weight = weight;
        self
    }

    /// Enable or disable population weighting of the mapping.
    pub fn with_frame_weighting(mut self, frame_weighted_sim: bool) -> Self {
        self.frame_weighted_sim = frame_weighted_sim;
        self
    }

    pub fn with_n_clusters(mut self, n_clusters: Option<usize>) -> Self {
        self.n_clusters = n_clusters;
        self
    }

    pub fn with_trim_frac(mut self, trim_frac: Option<f64>) -> Self {
        self.trim_frac = trim_frac;
        self
    }

    pub fn with_activation_threshold(mut self, threshold: Option<f64>) -> Self {
        self.activation_threshold = threshold;
        self
    }

    /// Enable or disable parallel processing across clusters.
    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// True when a non-zero trim fraction is configured.
    pub fn is_trimming(&self) -> bool {
        matches!(self.trim_frac, Some(f) if f != 0.0)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), SimCalcError> {
        if !self.n_ary.supports_pairwise() {
            return Err(EsimError::UnsupportedPairwiseIndex(self.n_ary).into());
        }
        if let Some(frac) = self.trim_frac {
            if !(0.0..1.0).contains(&frac) {
                return Err(EsimError::InvalidTrimFraction(frac).into());
            }
        }
        if let Some(threshold) = self.activation_threshold {
            validate_activation_threshold(threshold)?;
        }
        if let Some(n) = self.n_clusters {
            if n < 2 {
                return Err(SimCalcError::InvalidClusterCount { n_clusters: n });
            }
        }
        Ok(())
    }
}

/// Errors raised while building or persisting similarity mappings.
#[derive(Debug, Error)]
pub enum SimCalcError {
    #[error(transparent)]
    Esim(#[from] EsimError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error("frame weighting requested but no population summary was given")]
    MissingSummary,

    #[error("n_clusters must be at least 2 (got {n_clusters})")]
    InvalidClusterCount { n_clusters: usize },

    #[error("no clusters to compare against the dominant cluster")]
    NoOtherClusters,

    #[error("population summary has no frames outside the dominant cluster")]
    ZeroPopulation,

    #[error("frame f{frame} has {values} values but {weights} weights")]
    LengthMismatch {
        frame: usize,
        values: usize,
        weights: usize,
    },

    #[error("similarity mapping is empty")]
    EmptyMapping,

    #[error("similarity mapping holds no comparable value")]
    NoComparableValue,

    #[error("row f{frame}: {detail}")]
    InconsistentRow { frame: usize, detail: String },

    #[error("unknown method '{0}'; expected pairwise, union, medoid or outlier")]
    UnknownMethod(String),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid similarity mapping JSON: {0}")]
    Json(#[from] serde_json::Error),
}
