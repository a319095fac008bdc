//! Cluster inputs for representative-frame selection.
//!
//! Clusters arrive as normalized fingerprint matrices written by an upstream
//! normalization step, one file per cluster, named `{base}.c{id}`. This crate
//! loads them, validates their shape, and parses the identifiers embedded in
//! file names and mapping keys.
//!
//! ## What we check
//!
//! - Every file parses to a rectangular, non-empty matrix.
//! - Every cluster has the dominant cluster's dimensionality; a mismatch is
//!   rejected rather than broadcast.
//! - Cluster ids are taken from the file name only and sorted numerically.
//!
//! Clusters are read-only once loaded; trimming and selection produce new
//! values.

use std::fs;
use std::path::{Path, PathBuf};

use ndarray::{Array2, ArrayView2};

mod error;
pub mod ids;
pub mod matrix;
pub mod summary;

pub use crate::error::ClusterError;
pub use crate::ids::{ClusterId, FrameLabel};
pub use crate::matrix::{find_row, load_matrix, parse_matrix};
pub use crate::summary::PopulationSummary;

/// Default base name of normalized cluster files.
pub const DEFAULT_CLUSTER_BASE_NAME: &str = "normed_clusttraj";

/// One cluster of normalized frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub id: ClusterId,
    pub frames: Array2<f64>,
}

impl Cluster {
    pub fn new(id: ClusterId, frames: Array2<f64>) -> Self {
        Self { id, frames }
    }

    /// Load a cluster file, taking the id from its name.
    pub fn load(path: &Path) -> Result<Self, ClusterError> {
        let id = ClusterId::from_path(path)?;
        let frames = load_matrix(path)?;
        Ok(Self { id, frames })
    }

    pub fn n_frames(&self) -> usize {
        self.frames.nrows()
    }

    pub fn dim(&self) -> usize {
        self.frames.ncols()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.frames.view()
    }

    /// Reject clusters whose dimensionality differs from `expected`.
    pub fn ensure_dim(&self, expected: usize) -> Result<(), ClusterError> {
        if self.dim() != expected {
            return Err(ClusterError::DimensionMismatch {
                cluster: self.id.to_string(),
                expected,
                found: self.dim(),
            });
        }
        Ok(())
    }
}

/// List `{base_name}.c{id}` files in `folder`, sorted by id.
///
/// Names with the prefix but a non-numeric suffix (e.g. `.c0.npy`) are
/// skipped.
pub fn discover_cluster_files(
    folder: &Path,
    base_name: &str,
) -> Result<Vec<(ClusterId, PathBuf)>, ClusterError> {
    let io_err = |source| ClusterError::Io {
        path: folder.to_path_buf(),
        source,
    };
    let prefix = format!("{base_name}.c");

    let mut found = Vec::new();
    for entry in fs::read_dir(folder).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(suffix) = name.strip_prefix(&prefix) else {
            continue;
        };
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            tracing::debug!(file = %name, "skipping non-cluster file");
            continue;
        }
        let id = ClusterId::from_path(&path)?;
        found.push((id, path));
    }

    found.sort_by_key(|(id, _)| *id);
    for pair in found.windows(2) {
        if pair[0].0 == pair[1].0 {
            return Err(ClusterError::DuplicateClusterId(pair[0].0 .0));
        }
    }
    Ok(found)
}

/// The dominant cluster plus every other cluster, ordered by id.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSet {
    pub dominant: Cluster,
    pub others: Vec<Cluster>,
}

impl ClusterSet {
    /// Assemble a set, sorting `others` by id and checking dimensions.
    pub fn new(dominant: Cluster, mut others: Vec<Cluster>) -> Result<Self, ClusterError> {
        let dim = dominant.dim();
        others.sort_by_key(|c| c.id);
        for cluster in &others {
            cluster.ensure_dim(dim)?;
        }
        Ok(Self { dominant, others })
    }

    /// Load every `{base_name}.c{id}` file in `folder`. Id 0 is dominant.
    pub fn load(folder: &Path, base_name: &str) -> Result<Self, ClusterError> {
        let files = discover_cluster_files(folder, base_name)?;
        let mut dominant = None;
        let mut others = Vec::with_capacity(files.len().saturating_sub(1));
        for (id, path) in files {
            let cluster = Cluster::new(id, load_matrix(&path)?);
            if id.is_dominant() {
                dominant = Some(cluster);
            } else {
                others.push(cluster);
            }
        }
        let dominant = dominant.ok_or_else(|| ClusterError::MissingDominant(folder.to_path_buf()))?;

        tracing::info!(
            folder = %folder.display(),
            dominant_frames = dominant.n_frames(),
            other_clusters = others.len(),
            dim = dominant.dim(),
            "clusters_loaded"
        );
        Self::new(dominant, others)
    }

    pub fn dim(&self) -> usize {
        self.dominant.dim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn discovers_clusters_in_numeric_order() {
        let dir = tempdir().unwrap();
        for id in [10, 2, 0, 1] {
            write(dir.path(), &format!("normed_clusttraj.c{id}"), "1 0\n");
        }
        write(dir.path(), "normed_clusttraj.c0.npy", "junk");
        write(dir.path(), "normed_data.txt", "1 0\n");

        let files = discover_cluster_files(dir.path(), DEFAULT_CLUSTER_BASE_NAME).unwrap();
        let ids: Vec<usize> = files.iter().map(|(id, _)| id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 10]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let dir = tempdir().unwrap();
        write(dir.path(), "normed_clusttraj.c1", "1 0\n");
        write(dir.path(), "normed_clusttraj.c01", "1 0\n");
        let err = discover_cluster_files(dir.path(), DEFAULT_CLUSTER_BASE_NAME).unwrap_err();
        assert!(matches!(err, ClusterError::DuplicateClusterId(1)));
    }

    #[test]
    fn loads_set_with_dominant_first() {
        let dir = tempdir().unwrap();
        write(dir.path(), "normed_clusttraj.c0", "1 0 1\n1 1 1\n");
        write(dir.path(), "normed_clusttraj.c2", "0 0 1\n");
        write(dir.path(), "normed_clusttraj.c1", "1 0 1\n");

        let set = ClusterSet::load(dir.path(), DEFAULT_CLUSTER_BASE_NAME).unwrap();
        assert_eq!(set.dominant.id, ClusterId::DOMINANT);
        assert_eq!(set.dominant.frames, array![[1.0, 0.0, 1.0], [1.0, 1.0, 1.0]]);
        let ids: Vec<ClusterId> = set.others.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![ClusterId(1), ClusterId(2)]);
        assert_eq!(set.dim(), 3);
    }

    #[test]
    fn missing_dominant_is_an_error() {
        let dir = tempdir().unwrap();
        write(dir.path(), "normed_clusttraj.c1", "1 0 1\n");
        let err = ClusterSet::load(dir.path(), DEFAULT_CLUSTER_BASE_NAME).unwrap_err();
        assert!(matches!(err, ClusterError::MissingDominant(_)));
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let dominant = Cluster::new(ClusterId(0), array![[1.0, 0.0, 1.0]]);
        let other = Cluster::new(ClusterId(1), array![[1.0, 0.0]]);
        let err = ClusterSet::new(dominant, vec![other]).unwrap_err();
        match err {
            ClusterError::DimensionMismatch {
                cluster,
                expected,
                found,
            } => {
                assert_eq!(cluster, "c1");
                assert_eq!((expected, found), (3, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn set_sorts_others_by_id() {
        let dominant = Cluster::new(ClusterId(0), array![[1.0]]);
        let others = vec![
            Cluster::new(ClusterId(3), array![[0.0]]),
            Cluster::new(ClusterId(1), array![[1.0]]),
        ];
        let set = ClusterSet::new(dominant, others).unwrap();
        assert_eq!(set.others[0].id, ClusterId(1));
        assert_eq!(set.others[1].id, ClusterId(3));
    }

    #[test]
    fn cluster_load_uses_file_name_id() {
        let dir = tempdir().unwrap();
        write(dir.path(), "normed_clusttraj.c4", "0.5 0.5\n0.1 0.9\n");
        let cluster = Cluster::load(&dir.path().join("normed_clusttraj.c4")).unwrap();
        assert_eq!(cluster.id, ClusterId(4));
        assert_eq!(cluster.n_frames(), 2);
        assert_eq!(cluster.dim(), 2);
    }
}
