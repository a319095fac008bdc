//! Whitespace-delimited numeric matrices.
//!
//! One row per frame, one column per fingerprint feature. Blank lines and
//! lines starting with `#` are skipped. Every data row must have the same
//! number of columns as the first.

use std::fs;
use std::path::Path;

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::ClusterError;

/// Read a normalized matrix from disk.
pub fn load_matrix(path: &Path) -> Result<Array2<f64>, ClusterError> {
    let text = fs::read_to_string(path).map_err(|source| ClusterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let matrix = parse_matrix(&text, &path.display().to_string())?;
    tracing::debug!(
        path = %path.display(),
        rows = matrix.nrows(),
        cols = matrix.ncols(),
        "matrix_loaded"
    );
    Ok(matrix)
}

/// Parse matrix text. `source_name` is only used in error messages.
pub fn parse_matrix(text: &str, source_name: &str) -> Result<Array2<f64>, ClusterError> {
    let mut values: Vec<f64> = Vec::new();
    let mut n_cols: Option<usize> = None;
    let mut n_rows = 0usize;

    for (line_idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let before = values.len();
        for (col, token) in trimmed.split_whitespace().enumerate() {
            let value = token.parse::<f64>().map_err(|_| ClusterError::Parse {
                source_name: source_name.to_string(),
                line: line_idx + 1,
                column: col,
                token: token.to_string(),
            })?;
            values.push(value);
        }
        let found = values.len() - before;
        match n_cols {
            None => n_cols = Some(found),
            Some(expected) if expected != found => {
                return Err(ClusterError::RaggedRow {
                    source_name: source_name.to_string(),
                    line: line_idx + 1,
                    expected,
                    found,
                });
            }
            Some(_) => {}
        }
        n_rows += 1;
    }

    let n_cols = match n_cols {
        Some(cols) if n_rows > 0 => cols,
        _ => {
            return Err(ClusterError::Empty {
                source_name: source_name.to_string(),
            })
        }
    };

    // Row count and column count were checked line by line above.
    Array2::from_shape_vec((n_rows, n_cols), values).map_err(|_| ClusterError::Empty {
        source_name: source_name.to_string(),
    })
}

/// Index of the first row of `data` exactly equal to `row`.
pub fn find_row(data: ArrayView2<'_, f64>, row: ArrayView1<'_, f64>) -> Option<usize> {
    data.axis_iter(Axis(0)).position(|candidate| candidate == row)
}
