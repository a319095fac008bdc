//! Counter engine: classifies every column of a column-sum vector.
//!
//! For `n` fingerprints summed into `c_total`, column `j` has margin
//! `m = 2 * c_total[j] - n`. Positive margins beyond the threshold are
//! 1-similarities (`a`), negative ones are 0-similarities (`d`), and the rest
//! are dissimilarities. The weighted counters accumulate the
//! [`WFactor`] of each column instead of 1.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::config::{CThreshold, EsimError, WFactor};

/// Similarity and dissimilarity counters for one group of fingerprints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Counters {
    /// Columns where the group agrees on "active".
    pub a: usize,
    pub w_a: f64,
    /// Columns where the group agrees on "inactive".
    pub d: usize,
    pub w_d: f64,
    /// `a + d`.
    pub total_sim: usize,
    pub total_w_sim: f64,
    pub total_dis: usize,
    pub total_w_dis: f64,
    /// Number of classified columns: `total_sim + total_dis`.
    pub p: usize,
    pub w_p: f64,
}

/// Compute the counters for `n_objects` fingerprints whose column sums are
/// `c_total`.
///
/// Columns holding NaN fall in no category and are not counted in `p`.
pub fn calculate_counters(
    c_total: ArrayView1<'_, f64>,
    n_objects: usize,
    c_threshold: CThreshold,
    w_factor: WFactor,
) -> Result<Counters, EsimError> {
    if n_objects == 0 {
        return Err(EsimError::NoObjects);
    }
    if c_total.is_empty() {
        return Err(EsimError::EmptyData);
    }

    let threshold = c_threshold.resolve(n_objects)?;
    let n = n_objects as f64;

    let mut counters = Counters::default();
    for &c in c_total.iter() {
        let margin = 2.0 * c - n;
        if margin > threshold {
            counters.a += 1;
            counters.w_a += w_factor.similar(margin, n_objects);
        } else if -margin > threshold {
            counters.d += 1;
            counters.w_d += w_factor.similar(margin.abs(), n_objects);
        } else if margin.abs() <= threshold {
            counters.total_dis += 1;
            counters.total_w_dis += w_factor.dissimilar(margin.abs(), n_objects);
        }
    }

    counters.total_sim = counters.a + counters.d;
    counters.total_w_sim = counters.w_a + counters.w_d;
    counters.p = counters.total_sim + counters.total_dis;
    counters.w_p = counters.total_w_sim + counters.total_w_dis;

    if counters.p == 0 {
        return Err(EsimError::NoComparedColumns);
    }
    Ok(counters)
}
