use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating cluster inputs.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{source_name}:{line}: column {column} is not a number: '{token}'")]
    Parse {
        source_name: String,
        line: usize,
        column: usize,
        token: String,
    },

    #[error("{source_name}:{line}: expected {expected} columns, found {found}")]
    RaggedRow {
        source_name: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{source_name}: no data rows")]
    Empty { source_name: String },

    #[error("cluster {cluster} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        cluster: String,
        expected: usize,
        found: usize,
    },

    #[error("malformed identifier '{0}'")]
    MalformedId(String),

    #[error("duplicate cluster id {0}")]
    DuplicateClusterId(usize),

    #[error("no dominant cluster (id 0) found in {0}")]
    MissingDominant(PathBuf),

    #[error("{source_name}:{line}: missing frame count column")]
    MissingCountColumn { source_name: String, line: usize },
}
