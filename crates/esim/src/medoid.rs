//! Medoid and outlier selection by complement similarity.
//!
//! The complement similarity of row `i` is the n-ary similarity of all the
//! other rows taken together: the column sum minus row `i`, compared as
//! `m - 1` objects. The medoid is the row with the largest complement
//! similarity, the outlier the row with the smallest. Ties resolve to the
//! lowest index.

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::config::{EsimError, NAry, WeightScheme};
use crate::index::sim_index;

/// Complement similarity of every row in `data`.
///
/// Needs at least two rows; a single row has no complement.
pub fn complement_similarities(
    data: ArrayView2<'_, f64>,
    n_ary: NAry,
    weight: WeightScheme,
) -> Result<Array1<f64>, EsimError> {
    let c_total = data.sum_axis(Axis(0));
    complement_similarities_with_total(data, c_total.view(), n_ary, weight)
}

/// Same as [`complement_similarities`] with a precomputed column sum.
pub fn complement_similarities_with_total(
    data: ArrayView2<'_, f64>,
    c_total: ArrayView1<'_, f64>,
    n_ary: NAry,
    weight: WeightScheme,
) -> Result<Array1<f64>, EsimError> {
    let n_rows = data.nrows();
    if n_rows == 0 {
        return Err(EsimError::EmptyData);
    }
    let mut sims = Array1::zeros(n_rows);
    for (i, row) in data.axis_iter(Axis(0)).enumerate() {
        let comp = &c_total - &row;
        sims[i] = sim_index(comp.view(), n_rows - 1, n_ary, weight)?;
    }
    Ok(sims)
}

/// Index of the most representative row (largest complement similarity).
pub fn calculate_medoid(
    data: ArrayView2<'_, f64>,
    n_ary: NAry,
    weight: WeightScheme,
) -> Result<usize, EsimError> {
    match data.nrows() {
        0 => Err(EsimError::EmptyData),
        1 => Ok(0),
        _ => {
            let sims = complement_similarities(data, n_ary, weight)?;
            Ok(first_extreme(sims.view(), |candidate, best| candidate > best))
        }
    }
}

/// Index of the least representative row (smallest complement similarity).
pub fn calculate_outlier(
    data: ArrayView2<'_, f64>,
    n_ary: NAry,
    weight: WeightScheme,
) -> Result<usize, EsimError> {
    match data.nrows() {
        0 => Err(EsimError::EmptyData),
        1 => Ok(0),
        _ => {
            let sims = complement_similarities(data, n_ary, weight)?;
            Ok(first_extreme(sims.view(), |candidate, best| candidate < best))
        }
    }
}

/// First index whose value beats every earlier one under `better`.
///
/// A NaN never replaces the running best; an all-NaN input selects index 0.
fn first_extreme(values: ArrayView1<'_, f64>, better: impl Fn(f64, f64) -> bool) -> usize {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, best_val)) if !better(v, best_val) => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn cluster() -> Array2<f64> {
        array![
            [1.0, 1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0, 0.0],
            [0.0, 0.0, 1.0, 1.0],
        ]
    }

    #[test]
    fn complement_similarity_per_row() {
        let data = cluster();
        let sims =
            complement_similarities(data.view(), NAry::RR, WeightScheme::NonWeighted).unwrap();
        assert_eq!(sims.len(), 4);
        // Without the last row the first two columns are unanimous.
        assert!((sims[3] - 0.5).abs() < 1e-12);
        assert_eq!(sims[0], 0.0);
    }

    #[test]
    fn medoid_and_outlier_pick_opposite_ends() {
        let data = cluster();
        let medoid = calculate_medoid(data.view(), NAry::RR, WeightScheme::NonWeighted).unwrap();
        let outlier =
            calculate_outlier(data.view(), NAry::RR, WeightScheme::NonWeighted).unwrap();
        assert_eq!(medoid, 3);
        assert_eq!(outlier, 0);
        assert_ne!(medoid, outlier);
    }

    #[test]
    fn uniform_cluster_ties_resolve_to_first_row() {
        let data = array![[1.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 0.0, 1.0]];
        for weight in [WeightScheme::NonWeighted, WeightScheme::Weighted] {
            assert_eq!(calculate_medoid(data.view(), NAry::SM, weight).unwrap(), 0);
            assert_eq!(calculate_outlier(data.view(), NAry::SM, weight).unwrap(), 0);
        }
    }

    #[test]
    fn single_row_cluster_is_its_own_medoid() {
        let data = array![[0.3, 0.7]];
        assert_eq!(calculate_medoid(data.view(), NAry::RR, WeightScheme::NonWeighted).unwrap(), 0);
        assert_eq!(calculate_outlier(data.view(), NAry::RR, WeightScheme::NonWeighted).unwrap(), 0);
    }

    #[test]
    fn empty_cluster_is_rejected() {
        let data = Array2::<f64>::zeros((0, 3));
        assert_eq!(
            calculate_medoid(data.view(), NAry::RR, WeightScheme::NonWeighted),
            Err(EsimError::EmptyData)
        );
    }

    #[test]
    fn precomputed_total_gives_same_result() {
        let data = cluster();
        let total = data.sum_axis(Axis(0));
        let a = complement_similarities(data.view(), NAry::SM, WeightScheme::Weighted).unwrap();
        let b = complement_similarities_with_total(
            data.view(),
            total.view(),
            NAry::SM,
            WeightScheme::Weighted,
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn first_extreme_skips_nan() {
        let values = array![f64::NAN, 0.2, 0.9, 0.9];
        assert_eq!(first_extreme(values.view(), |c, b| c > b), 2);
        assert_eq!(first_extreme(values.view(), |c, b| c < b), 1);
        let all_nan = array![f64::NAN, f64::NAN];
        assert_eq!(first_extreme(all_nan.view(), |c, b| c > b), 0);
    }
}
