//! Representative-frame lookup over a similarity mapping.

use crate::mapping::SimilarityMapping;
use crate::types::SimCalcError;

/// Frame whose row holds the largest value, averages included.
///
/// Frames are scanned in ascending order and each row's values before its
/// average; only a strictly larger value replaces the current best, so the
/// first occurrence wins. NaN never wins.
pub fn max_frame(mapping: &SimilarityMapping) -> Result<usize, SimCalcError> {
    if mapping.is_empty() {
        return Err(SimCalcError::EmptyMapping);
    }
    let mut best: Option<(usize, f64)> = None;
    for (frame, row) in mapping.iter() {
        for &value in row.values.iter().chain(std::iter::once(&row.average)) {
            if value.is_nan() {
                continue;
            }
            match best {
                Some((_, current)) if value <= current => {}
                _ => best = Some((frame, value)),
            }
        }
    }
    best.map(|(frame, _)| frame)
        .ok_or(SimCalcError::NoComparableValue)
}
