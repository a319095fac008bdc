use std::path::Path;
use std::time::Instant;

use cluster::{Cluster, ClusterError, ClusterSet, PopulationSummary};
use esim::{
    binarize, calculate_counters, calculate_medoid, calculate_outlier, pair_similarity, sim_index,
    trim_outliers, CThreshold, NAry, WFactor,
};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;
use tracing::{info, span, Level};

use crate::mapping::{SimilarityMapping, SimilarityRow};
use crate::types::{CalculatorConfig, Method, SimCalcError};
use crate::weighting::{population_weights, weight_mapping};

/// Compares every frame of the dominant cluster against the other clusters.
///
/// With an activation threshold every cluster is binarized first. The
/// dominant cluster is then trimmed once at construction. Every `calculate_*`
/// call is independent and returns a fresh mapping.
#[derive(Debug, Clone)]
pub struct SimilarityCalculator {
    config: CalculatorConfig,
    dominant: Array2<f64>,
    others: Vec<Cluster>,
    weights: Option<Vec<f64>>,
}

impl SimilarityCalculator {
    pub fn new(
        dominant: Cluster,
        others: Vec<Cluster>,
        summary: Option<&PopulationSummary>,
        config: CalculatorConfig,
    ) -> Result<Self, SimCalcError> {
        config.validate()?;

        for cluster in std::iter::once(&dominant).chain(&others) {
            if cluster.n_frames() == 0 {
                return Err(ClusterError::Empty {
                    source_name: cluster.id.to_string(),
                }
                .into());
            }
        }
        let ClusterSet {
            mut dominant,
            mut others,
        } = ClusterSet::new(dominant, others)?;

        if let Some(n) = config.n_clusters {
            others.truncate(n - 1);
        }
        if others.is_empty() {
            return Err(SimCalcError::NoOtherClusters);
        }

        if let Some(threshold) = config.activation_threshold {
            for cluster in std::iter::once(&mut dominant).chain(others.iter_mut()) {
                cluster.frames = binarize(cluster.view(), threshold)?;
            }
        }

        let weights = if config.frame_weighted_sim {
            let summary = summary.ok_or(SimCalcError::MissingSummary)?;
            Some(population_weights(summary, config.n_clusters)?)
        } else {
            None
        };

        let untrimmed = dominant.n_frames();
        let dominant = trim_outliers(dominant.view(), config.trim_frac, config.n_ary, config.weight)?;

        info!(
            dominant_frames = dominant.nrows(),
            trimmed = untrimmed - dominant.nrows(),
            other_clusters = others.len(),
            n_ary = %config.n_ary,
            weight = %config.weight,
            frame_weighted = config.frame_weighted_sim,
            activation_threshold = ?config.activation_threshold,
            "calculator_ready"
        );

        Ok(Self {
            config,
            dominant,
            others,
            weights,
        })
    }

    /// Load `{base_name}.c*` from `folder`, plus the summary when weighting.
    pub fn from_folder(
        folder: &Path,
        base_name: &str,
        summary_file: &Path,
        config: CalculatorConfig,
    ) -> Result<Self, SimCalcError> {
        let set = ClusterSet::load(folder, base_name)?;
        let summary = if config.frame_weighted_sim {
            Some(PopulationSummary::load(summary_file)?)
        } else {
            None
        };
        Self::new(set.dominant, set.others, summary.as_ref(), config)
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// The dominant cluster after activation and trimming.
    pub fn dominant(&self) -> ArrayView2<'_, f64> {
        self.dominant.view()
    }

    pub fn others(&self) -> &[Cluster] {
        &self.others
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn calculate(&self, method: Method) -> Result<SimilarityMapping, SimCalcError> {
        let span = span!(Level::INFO, "calculate", method = %method);
        let _guard = span.enter();
        let start = Instant::now();

        let columns = self.columns(|ck| self.column(method, ck))?;
        let mapping = self.assemble(&columns)?;

        info!(
            frames = mapping.len(),
            clusters = columns.len(),
            elapsed_micros = start.elapsed().as_micros() as u64,
            "mapping_computed"
        );
        Ok(mapping)
    }

    pub fn calculate_pairwise(&self) -> Result<SimilarityMapping, SimCalcError> {
        self.calculate(Method::Pairwise)
    }

    pub fn calculate_union(&self) -> Result<SimilarityMapping, SimCalcError> {
        self.calculate(Method::Union)
    }

    pub fn calculate_medoid(&self) -> Result<SimilarityMapping, SimCalcError> {
        self.calculate(Method::Medoid)
    }

    pub fn calculate_outlier(&self) -> Result<SimilarityMapping, SimCalcError> {
        self.calculate(Method::Outlier)
    }

    /// One value per dominant frame for each other cluster, in cluster order.
    fn columns<F>(&self, per_cluster: F) -> Result<Vec<Vec<f64>>, SimCalcError>
    where
        F: Fn(&Cluster) -> Result<Vec<f64>, SimCalcError> + Sync,
    {
        if self.config.use_parallel {
            self.others.par_iter().map(&per_cluster).collect()
        } else {
            self.others.iter().map(per_cluster).collect()
        }
    }

    fn column(&self, method: Method, ck: &Cluster) -> Result<Vec<f64>, SimCalcError> {
        let n_ary = self.config.n_ary;
        let weight = self.config.weight;
        match method {
            Method::Pairwise => self
                .dominant
                .axis_iter(Axis(0))
                .map(|x| -> Result<f64, SimCalcError> {
                    let mut total = 0.0;
                    for y in ck.frames.axis_iter(Axis(0)) {
                        total += pair_value(x, y, n_ary)?;
                    }
                    Ok(total / ck.n_frames() as f64)
                })
                .collect(),
            Method::Union => {
                let c_sum = ck.frames.sum_axis(Axis(0));
                let n_objects = ck.n_frames() + 1;
                self.dominant
                    .axis_iter(Axis(0))
                    .map(|x| -> Result<f64, SimCalcError> {
                        let c_total = &c_sum + &x;
                        Ok(sim_index(c_total.view(), n_objects, n_ary, weight)?)
                    })
                    .collect()
            }
            Method::Medoid | Method::Outlier => {
                let pick = if method == Method::Medoid {
                    calculate_medoid(ck.view(), n_ary, weight)?
                } else {
                    calculate_outlier(ck.view(), n_ary, weight)?
                };
                let reference = ck.frames.row(pick);
                tracing::debug!(cluster = %ck.id, %method, frame = pick, "reference_frame");
                self.dominant
                    .axis_iter(Axis(0))
                    .map(|x| pair_value(x, reference, n_ary))
                    .collect()
            }
        }
    }

    /// Transpose per-cluster columns into per-frame rows, then weight.
    fn assemble(&self, columns: &[Vec<f64>]) -> Result<SimilarityMapping, SimCalcError> {
        let raw: SimilarityMapping = (0..self.dominant.nrows())
            .map(|frame| {
                let values = columns.iter().map(|col| col[frame]).collect();
                (frame, SimilarityRow::new(values))
            })
            .collect();
        match &self.weights {
            Some(weights) => weight_mapping(&raw, weights),
            None => Ok(raw),
        }
    }
}

/// Pairwise similarity of two frames: counters over `x + y` with `n = 2`.
fn pair_value(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>, n_ary: NAry) -> Result<f64, SimCalcError> {
    let c_total = &x + &y;
    let counters = calculate_counters(c_total.view(), 2, CThreshold::Auto, WFactor::Fraction)?;
    Ok(pair_similarity(&counters, n_ary)?)
}
