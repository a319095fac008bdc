//! Population weighting of similarity mappings.

use cluster::PopulationSummary;

use crate::mapping::{SimilarityMapping, SimilarityRow};
use crate::types::SimCalcError;

/// Share of each non-dominant cluster in the analyzed population.
///
/// Counts are cut to the first `n_clusters` entries (dominant included), the
/// dominant entry is dropped, and the rest are normalized by their own sum:
/// `[10, 20, 30]` gives `[0.4, 0.6]`.
pub fn population_weights(
    summary: &PopulationSummary,
    n_clusters: Option<usize>,
) -> Result<Vec<f64>, SimCalcError> {
    let take = n_clusters.unwrap_or(summary.len()).min(summary.len());
    let others = summary.counts.get(1..take).unwrap_or(&[]);
    let total: u64 = others.iter().sum();
    if total == 0 {
        return Err(SimCalcError::ZeroPopulation);
    }
    Ok(others.iter().map(|&c| c as f64 / total as f64).collect())
}

/// Scale each row's values by `weights` and recompute the averages.
///
/// Values past `weights.len()` are dropped; a row with fewer values than
/// weights is an error.
pub fn weight_mapping(
    mapping: &SimilarityMapping,
    weights: &[f64],
) -> Result<SimilarityMapping, SimCalcError> {
    mapping
        .iter()
        .map(|(frame, row)| {
            if row.values.len() < weights.len() {
                return Err(SimCalcError::LengthMismatch {
                    frame,
                    values: row.values.len(),
                    weights: weights.len(),
                });
            }
            let values = row
                .values
                .iter()
                .zip(weights)
                .map(|(v, w)| v * w)
                .collect();
            Ok((frame, SimilarityRow::new(values)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn weights_exclude_dominant_cluster() {
        let weights = population_weights(&PopulationSummary::new(vec![10, 20, 30]), None).unwrap();
        assert_eq!(weights.len(), 2);
        assert!(close(weights[0], 0.4));
        assert!(close(weights[1], 0.6));
    }

    #[test]
    fn cluster_cap_truncates_before_normalizing() {
        let summary = PopulationSummary::new(vec![100, 30, 10, 60]);
        let weights = population_weights(&summary, Some(3)).unwrap();
        assert!(close(weights[0], 0.75));
        assert!(close(weights[1], 0.25));

        // A cap beyond the summary uses every cluster.
        let all = population_weights(&summary, Some(10)).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn zero_population_is_an_error() {
        assert!(matches!(
            population_weights(&PopulationSummary::new(vec![5, 0, 0]), None),
            Err(SimCalcError::ZeroPopulation)
        ));
        assert!(matches!(
            population_weights(&PopulationSummary::new(vec![5]), None),
            Err(SimCalcError::ZeroPopulation)
        ));
    }

    #[test]
    fn weighting_recomputes_average() {
        let mapping: SimilarityMapping = [(0, SimilarityRow::new(vec![0.5, 1.0]))]
            .into_iter()
            .collect();
        let weighted = weight_mapping(&mapping, &[0.4, 0.6]).unwrap();
        let row = weighted.get(0).unwrap();
        assert!(close(row.values[0], 0.2));
        assert!(close(row.values[1], 0.6));
        assert!(close(row.average, 0.4));
    }

    #[test]
    fn extra_values_are_dropped() {
        let mapping: SimilarityMapping = [(3, SimilarityRow::new(vec![1.0, 1.0, 1.0]))]
            .into_iter()
            .collect();
        let weighted = weight_mapping(&mapping, &[0.5, 0.5]).unwrap();
        let row = weighted.get(3).unwrap();
        assert_eq!(row.values, vec![0.5, 0.5]);
        assert!(close(row.average, 0.5));
    }

    #[test]
    fn fewer_values_than_weights_is_an_error() {
        let mapping: SimilarityMapping = [(7, SimilarityRow::new(vec![1.0]))].into_iter().collect();
        let err = weight_mapping(&mapping, &[0.5, 0.5]).unwrap_err();
        assert!(matches!(
            err,
            SimCalcError::LengthMismatch {
                frame: 7,
                values: 1,
                weights: 2
            }
        ));
    }
}
