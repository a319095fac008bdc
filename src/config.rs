//! YAML configuration for representative-frame selection.
//!
//! Every field has a default, so an empty document (or no file at all) runs
//! with the same settings as the reference scripts.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "villin headpiece, 10 clusters"
//!
//! paths:
//!   sim_folder: "nw"
//!   norm_folder: "v3_norm"
//!   summary_file: "summary"
//!   cluster_base_name: "normed_clusttraj"
//!   all_data_file: "normed_data.txt"
//!
//! similarity:
//!   n_ary: "RR"
//!   weight: "nw"
//!   weighted_by_frames: true
//!   trim_frac: 0.1
//!   n_clusters: 10
//!   activation_threshold: 0.5
//!   use_parallel: false
//!
//! output:
//!   output_name: "rep"
//!   log_level: "info"
//!   log_json: false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use esim::{NAry, WeightScheme};
use serde::{Deserialize, Serialize};
use simcalc::CalculatorConfig;
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct RepFrameConfig {
    /// Configuration format version
    #[serde(default = "default_config_version")]
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub paths: PathsYamlConfig,

    #[serde(default)]
    pub similarity: SimilarityYamlConfig,

    #[serde(default)]
    pub output: OutputYamlConfig,
}

impl RepFrameConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: RepFrameConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate the configuration. Call again after applying overrides.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.paths.validate()?;
        self.similarity.validate()?;
        self.output.validate()?;

        Ok(())
    }

    /// Calculator settings implied by the `similarity` section.
    pub fn calculator_config(&self) -> CalculatorConfig {
        let s = &self.similarity;
        CalculatorConfig::new()
            .with_n_ary(s.n_ary)
            .with_weight(s.weight)
            .with_frame_weighting(s.weighted_by_frames)
            .with_n_clusters(s.n_clusters)
            .with_trim_frac(s.trim_frac)
            .with_activation_threshold(s.activation_threshold)
            .with_parallel(s.use_parallel)
    }
}

impl Default for RepFrameConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            name: None,
            paths: PathsYamlConfig::default(),
            similarity: SimilarityYamlConfig::default(),
            output: OutputYamlConfig::default(),
        }
    }
}

/// Input and output locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsYamlConfig {
    /// Where similarity mappings and the output record live.
    #[serde(default = "default_sim_folder")]
    pub sim_folder: PathBuf,

    /// Where the normalized cluster files live.
    #[serde(default = "default_norm_folder")]
    pub norm_folder: PathBuf,

    /// Cluster population summary from the clustering step.
    #[serde(default = "default_summary_file")]
    pub summary_file: PathBuf,

    #[serde(default = "default_cluster_base_name")]
    pub cluster_base_name: String,

    /// Full normalized dataset, relative to `norm_folder`.
    #[serde(default = "default_all_data_file")]
    pub all_data_file: String,
}

impl PathsYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.cluster_base_name.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "paths.cluster_base_name must not be empty".to_string(),
            ));
        }
        if self.all_data_file.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "paths.all_data_file must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// `{norm_folder}/{cluster_base_name}.c0`
    pub fn dominant_cluster_file(&self) -> PathBuf {
        self.norm_folder
            .join(format!("{}.c{}", self.cluster_base_name, cluster::ClusterId::DOMINANT.0))
    }

    /// `{norm_folder}/{all_data_file}`
    pub fn all_data_path(&self) -> PathBuf {
        self.norm_folder.join(&self.all_data_file)
    }
}

impl Default for PathsYamlConfig {
    fn default() -> Self {
        Self {
            sim_folder: default_sim_folder(),
            norm_folder: default_norm_folder(),
            summary_file: default_summary_file(),
            cluster_base_name: default_cluster_base_name(),
            all_data_file: default_all_data_file(),
        }
    }
}

/// Similarity parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityYamlConfig {
    #[serde(default)]
    pub n_ary: NAry,

    #[serde(default)]
    pub weight: WeightScheme,

    /// Scale similarities by cluster population.
    #[serde(default = "true_value")]
    pub weighted_by_frames: bool,

    /// Fraction of the dominant cluster to trim; absent or 0 disables it.
    #[serde(default)]
    pub trim_frac: Option<f64>,

    /// Clusters to analyze, dominant included; absent means all.
    #[serde(default)]
    pub n_clusters: Option<usize>,

    /// Values `>=` this cutoff count as active; absent compares raw values.
    #[serde(default)]
    pub activation_threshold: Option<f64>,

    #[serde(default)]
    pub use_parallel: bool,
}

impl SimilarityYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if !self.n_ary.supports_pairwise() {
            return Err(ConfigLoadError::Validation(format!(
                "similarity.n_ary must be RR or SM (got {})",
                self.n_ary
            )));
        }
        if let Some(frac) = self.trim_frac {
            if !(0.0..1.0).contains(&frac) {
                return Err(ConfigLoadError::Validation(format!(
                    "similarity.trim_frac must be in [0, 1) (got {frac})"
                )));
            }
        }
        if let Some(n) = self.n_clusters {
            if n < 2 {
                return Err(ConfigLoadError::Validation(format!(
                    "similarity.n_clusters must be >= 2 (got {n})"
                )));
            }
        }
        if let Some(t) = self.activation_threshold {
            if !t.is_finite() {
                return Err(ConfigLoadError::Validation(format!(
                    "similarity.activation_threshold must be finite (got {t})"
                )));
            }
        }
        Ok(())
    }

    /// True when a non-zero trim fraction is configured.
    pub fn is_trimming(&self) -> bool {
        matches!(self.trim_frac, Some(f) if f != 0.0)
    }
}

impl Default for SimilarityYamlConfig {
    fn default() -> Self {
        Self {
            n_ary: NAry::RR,
            weight: WeightScheme::NonWeighted,
            weighted_by_frames: true,
            trim_frac: None,
            n_clusters: None,
            activation_threshold: None,
            use_parallel: false,
        }
    }
}

/// Output naming and logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputYamlConfig {
    #[serde(default = "default_output_name")]
    pub output_name: String,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_json: bool,
}

impl OutputYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.output_name.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "output.output_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for OutputYamlConfig {
    fn default() -> Self {
        Self {
            output_name: default_output_name(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

fn default_config_version() -> String {
    "1.0".to_string()
}
fn default_sim_folder() -> PathBuf {
    PathBuf::from("nw")
}
fn default_norm_folder() -> PathBuf {
    PathBuf::from("v3_norm")
}
fn default_summary_file() -> PathBuf {
    PathBuf::from("summary")
}
fn default_cluster_base_name() -> String {
    cluster::DEFAULT_CLUSTER_BASE_NAME.to_string()
}
fn default_all_data_file() -> String {
    "normed_data.txt".to_string()
}
fn true_value() -> bool {
    true
}
fn default_output_name() -> String {
    "rep".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
