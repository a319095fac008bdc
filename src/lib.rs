//! Representative-frame selection for molecular-dynamics trajectory clusters.
//!
//! This crate ties the workspace together: it reads a [`RepFrameConfig`],
//! builds similarity mappings between the dominant cluster and every other
//! cluster, and reports which frame each method considers most
//! representative.
//!
//! Mapping files are cached in `sim_folder`: an existing file is loaded, a
//! missing one is computed and written so later runs reuse it. A cached file
//! whose width disagrees with the clusters on disk is still used, with a
//! warning.

pub mod config;
pub mod naming;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use cluster::{discover_cluster_files, find_row, load_matrix, ClusterError};
use esim::{binarize, calculate_medoid, trim_outliers, EsimError};
use ndarray::Array2;
use simcalc::{max_frame, SimCalcError, SimilarityCalculator, SimilarityMapping};
use thiserror::Error;
use tracing::{debug, info, span, warn, Level};

pub use crate::config::{ConfigLoadError, RepFrameConfig};
pub use crate::naming::SimFileName;
pub use esim::{NAry, WeightScheme};
pub use simcalc::Method;

/// Errors raised by the representative-frame driver.
#[derive(Debug, Error)]
pub enum RepFrameError {
    #[error(transparent)]
    Config(#[from] ConfigLoadError),

    #[error(transparent)]
    SimCalc(#[from] SimCalcError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error(transparent)]
    Esim(#[from] EsimError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed similarity file name '{0}'")]
    MalformedFileName(String),

    #[error("trimmed medoid {index} has no matching row in the dominant cluster")]
    TrimmedMedoidNotFound { index: usize },
}

/// Frame index chosen by each method, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepresentativeFrames {
    pub medoid_all: usize,
    pub medoid_c0: usize,
    pub medoid_c0_trimmed: usize,
    pub pairwise: usize,
    pub union: usize,
    pub medoid: usize,
    pub outlier: usize,
}

impl RepresentativeFrames {
    pub const HEADER: &'static str = "# Frame number with max values by method: medoid_all, medoid_c0, medoid_c0(trimmed), pairwise, union, medoid, outlier";

    pub fn as_array(&self) -> [usize; 7] {
        [
            self.medoid_all,
            self.medoid_c0,
            self.medoid_c0_trimmed,
            self.pairwise,
            self.union,
            self.medoid,
            self.outlier,
        ]
    }

    /// Header line followed by the seven frames joined with `", "`.
    pub fn to_record(&self) -> String {
        let frames: Vec<String> = self.as_array().iter().map(usize::to_string).collect();
        format!("{}\n{}\n", Self::HEADER, frames.join(", "))
    }

    pub fn write(&self, path: &Path) -> Result<(), RepFrameError> {
        fs::write(path, self.to_record()).map_err(|source| RepFrameError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Path of the cached mapping for `method` under `cfg`.
///
/// The name encodes weighting by frames, the index and the trim fraction
/// only. Runs that differ in `weight`, `n_clusters` or
/// `activation_threshold` share a file; use a separate `sim_folder` for each.
pub fn mapping_path(cfg: &RepFrameConfig, method: Method) -> PathBuf {
    let s = &cfg.similarity;
    let name = SimFileName::mapping(method, s.n_ary, s.weighted_by_frames, s.trim_frac);
    cfg.paths.sim_folder.join(name.to_string())
}

/// Path of the representative-frame record under `cfg`.
pub fn output_path(cfg: &RepFrameConfig) -> PathBuf {
    let s = &cfg.similarity;
    let name = SimFileName::output(&cfg.output.output_name, s.n_ary, s.weighted_by_frames, s.trim_frac);
    cfg.paths.sim_folder.join(name.to_string())
}

/// Values per mapping row for `cfg`: one per non-dominant cluster file,
/// capped at `n_clusters - 1`.
pub fn expected_mapping_width(cfg: &RepFrameConfig) -> Result<usize, RepFrameError> {
    let files = discover_cluster_files(&cfg.paths.norm_folder, &cfg.paths.cluster_base_name)?;
    let others = files.iter().filter(|(id, _)| !id.is_dominant()).count();
    Ok(match cfg.similarity.n_clusters {
        Some(n) => others.min(n.saturating_sub(1)),
        None => others,
    })
}

/// Loads cached mappings and computes the missing ones, building the
/// calculator at most once.
struct MappingStore<'a> {
    cfg: &'a RepFrameConfig,
    calculator: Option<SimilarityCalculator>,
}

impl<'a> MappingStore<'a> {
    fn new(cfg: &'a RepFrameConfig) -> Self {
        Self {
            cfg,
            calculator: None,
        }
    }

    fn calculator(&mut self) -> Result<&SimilarityCalculator, RepFrameError> {
        let calc = match self.calculator.take() {
            Some(calc) => calc,
            None => {
                let paths = &self.cfg.paths;
                SimilarityCalculator::from_folder(
                    &paths.norm_folder,
                    &paths.cluster_base_name,
                    &paths.summary_file,
                    self.cfg.calculator_config(),
                )?
            }
        };
        Ok(self.calculator.insert(calc))
    }

    fn compute(&mut self, method: Method) -> Result<(SimilarityMapping, PathBuf), RepFrameError> {
        let path = mapping_path(self.cfg, method);
        let mapping = self.calculator()?.calculate(method)?;
        ensure_dir(&self.cfg.paths.sim_folder)?;
        mapping.save_json(&path)?;
        info!(%method, path = %path.display(), "mapping_written");
        Ok((mapping, path))
    }

    fn load_or_compute(&mut self, method: Method) -> Result<SimilarityMapping, RepFrameError> {
        let path = mapping_path(self.cfg, method);
        if path.is_file() {
            info!(%method, path = %path.display(), "mapping_cached");
            let mapping = SimilarityMapping::load_json(&path)?;
            self.check_cached_width(method, &path, &mapping);
            return Ok(mapping);
        }
        Ok(self.compute(method)?.0)
    }

    fn check_cached_width(&self, method: Method, path: &Path, mapping: &SimilarityMapping) {
        match expected_mapping_width(self.cfg) {
            Ok(expected) if mapping.width() != Some(expected) => warn!(
                %method,
                path = %path.display(),
                cached = ?mapping.width(),
                expected,
                "cached_mapping_width_mismatch"
            ),
            Ok(_) => {}
            Err(err) => debug!(%method, error = %err, "cached_mapping_unchecked"),
        }
    }
}

/// Load a matrix, binarized when an activation threshold is configured.
fn load_activated(cfg: &RepFrameConfig, path: &Path) -> Result<Array2<f64>, RepFrameError> {
    let data = load_matrix(path)?;
    match cfg.similarity.activation_threshold {
        Some(threshold) => Ok(binarize(data.view(), threshold)?),
        None => Ok(data),
    }
}

fn ensure_dir(dir: &Path) -> Result<(), RepFrameError> {
    fs::create_dir_all(dir).map_err(|source| RepFrameError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

/// Compute and write all four mapping files, replacing cached ones.
pub fn compute_mappings(cfg: &RepFrameConfig) -> Result<Vec<(Method, PathBuf)>, RepFrameError> {
    let span = span!(Level::INFO, "compute_mappings");
    let _guard = span.enter();
    let start = Instant::now();

    let mut store = MappingStore::new(cfg);
    let mut written = Vec::with_capacity(Method::ALL.len());
    for method in Method::ALL {
        let (_, path) = store.compute(method)?;
        written.push((method, path));
    }

    info!(
        files = written.len(),
        elapsed_micros = start.elapsed().as_micros() as u64,
        "mappings_computed"
    );
    Ok(written)
}

/// Representative frame for a single method.
pub fn representative_frame(cfg: &RepFrameConfig, method: Method) -> Result<usize, RepFrameError> {
    let mapping = MappingStore::new(cfg).load_or_compute(method)?;
    let frame = max_frame(&mapping)?;
    info!(%method, frame, "representative_frame");
    Ok(frame)
}

/// Representative frame for every method; writes the output record.
pub fn gen_method_max(cfg: &RepFrameConfig) -> Result<RepresentativeFrames, RepFrameError> {
    let span = span!(Level::INFO, "gen_method_max", n_ary = %cfg.similarity.n_ary);
    let _guard = span.enter();
    let start = Instant::now();

    let n_ary = cfg.similarity.n_ary;
    let weight = cfg.similarity.weight;

    let all = load_activated(cfg, &cfg.paths.all_data_path())?;
    let medoid_all = calculate_medoid(all.view(), n_ary, weight)?;

    let c0 = load_activated(cfg, &cfg.paths.dominant_cluster_file())?;
    let medoid_c0 = calculate_medoid(c0.view(), n_ary, weight)?;

    let medoid_c0_trimmed = if cfg.similarity.is_trimming() {
        let trimmed = trim_outliers(c0.view(), cfg.similarity.trim_frac, n_ary, weight)?;
        let index = calculate_medoid(trimmed.view(), n_ary, weight)?;
        find_row(c0.view(), trimmed.row(index))
            .ok_or(RepFrameError::TrimmedMedoidNotFound { index })?
    } else {
        medoid_c0
    };

    let mut store = MappingStore::new(cfg);
    let mut frame_for = |method: Method| -> Result<usize, RepFrameError> {
        let mapping = store.load_or_compute(method)?;
        Ok(max_frame(&mapping)?)
    };

    let frames = RepresentativeFrames {
        medoid_all,
        medoid_c0,
        medoid_c0_trimmed,
        pairwise: frame_for(Method::Pairwise)?,
        union: frame_for(Method::Union)?,
        medoid: frame_for(Method::Medoid)?,
        outlier: frame_for(Method::Outlier)?,
    };

    ensure_dir(&cfg.paths.sim_folder)?;
    let out = output_path(cfg);
    frames.write(&out)?;

    info!(
        path = %out.display(),
        frames = ?frames.as_array(),
        elapsed_micros = start.elapsed().as_micros() as u64,
        "representative_frames_written"
    );
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_layout() {
        let frames = RepresentativeFrames {
            medoid_all: 12,
            medoid_c0: 3,
            medoid_c0_trimmed: 4,
            pairwise: 0,
            union: 7,
            medoid: 7,
            outlier: 1,
        };
        let record = frames.to_record();
        let mut lines = record.lines();
        assert_eq!(lines.next(), Some(RepresentativeFrames::HEADER));
        assert_eq!(lines.next(), Some("12, 3, 4, 0, 7, 7, 1"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn paths_follow_naming_convention() {
        let mut cfg = RepFrameConfig::default();
        cfg.paths.sim_folder = PathBuf::from("sims");
        cfg.similarity.trim_frac = Some(0.1);
        assert_eq!(
            mapping_path(&cfg, Method::Union),
            PathBuf::from("sims/w_union_RR_t10.txt")
        );
        assert_eq!(output_path(&cfg), PathBuf::from("sims/w_rep_RR_t10.txt"));

        cfg.similarity.weighted_by_frames = false;
        cfg.similarity.trim_frac = None;
        assert_eq!(output_path(&cfg), PathBuf::from("sims/rep_RR.txt"));
    }
}
