//! Trimming of a cluster by complement similarity.

use ndarray::{Array2, ArrayView2, Axis};

use crate::config::{EsimError, NAry, WeightScheme};
use crate::medoid::complement_similarities;

/// Number of rows removed when trimming `n_rows` by `trim_frac`.
pub fn trim_count(n_rows: usize, trim_frac: Option<f64>) -> Result<usize, EsimError> {
    let Some(frac) = trim_frac else {
        return Ok(0);
    };
    if !(0.0..1.0).contains(&frac) {
        return Err(EsimError::InvalidTrimFraction(frac));
    }
    Ok((n_rows as f64 * frac).floor() as usize)
}

/// Indices of the rows that survive trimming, in their original order.
///
/// The `floor(n_rows * trim_frac)` rows with the highest complement
/// similarity are dropped; equal values drop the lower index first.
pub fn trim_indices(
    data: ArrayView2<'_, f64>,
    trim_frac: Option<f64>,
    n_ary: NAry,
    weight: WeightScheme,
) -> Result<Vec<usize>, EsimError> {
    let n_rows = data.nrows();
    let cutoff = trim_count(n_rows, trim_frac)?;
    if cutoff == 0 {
        return Ok((0..n_rows).collect());
    }

    let sims = complement_similarities(data, n_ary, weight)?;
    let mut order: Vec<usize> = (0..n_rows).collect();
    // NaN sorts last so it is never preferred for removal.
    let key = |i: usize| {
        let v = sims[i];
        if v.is_nan() { f64::NEG_INFINITY } else { v }
    };
    order.sort_by(|&x, &y| key(y).total_cmp(&key(x)));

    let mut removed = vec![false; n_rows];
    for &i in &order[..cutoff] {
        removed[i] = true;
    }
    Ok((0..n_rows).filter(|&i| !removed[i]).collect())
}

/// Return a copy of `data` without its trimmed rows.
pub fn trim_outliers(
    data: ArrayView2<'_, f64>,
    trim_frac: Option<f64>,
    n_ary: NAry,
    weight: WeightScheme,
) -> Result<Array2<f64>, EsimError> {
    let kept = trim_indices(data, trim_frac, n_ary, weight)?;
    Ok(data.select(Axis(0), &kept))
}
