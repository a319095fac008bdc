//! Similarity mapping: one row of per-cluster values per dominant frame.
//!
//! On disk a mapping is a JSON object keyed by frame label, each value the
//! per-cluster similarities followed by their average:
//!
//! ```json
//! {"f0": [0.61, 0.42, 0.515], "f1": [0.58, 0.47, 0.525]}
//! ```
//!
//! In memory the average is kept apart from the values so nothing has to be
//! appended or popped when a mapping is reweighted.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use cluster::FrameLabel;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::SimCalcError;

/// Values for one dominant frame, ordered by cluster id.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityRow {
    pub values: Vec<f64>,
    pub average: f64,
}

impl SimilarityRow {
    /// Build a row whose average is the arithmetic mean of `values`.
    pub fn new(values: Vec<f64>) -> Self {
        let average = mean(&values);
        Self { values, average }
    }

    fn to_flat(&self) -> Vec<f64> {
        let mut flat = Vec::with_capacity(self.values.len() + 1);
        flat.extend_from_slice(&self.values);
        flat.push(self.average);
        flat
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Frame index to [`SimilarityRow`], iterated in ascending frame order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimilarityMapping {
    rows: BTreeMap<usize, SimilarityRow>,
}

impl SimilarityMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, frame: usize, row: SimilarityRow) -> Option<SimilarityRow> {
        self.rows.insert(frame, row)
    }

    pub fn get(&self, frame: usize) -> Option<&SimilarityRow> {
        self.rows.get(&frame)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &SimilarityRow)> {
        self.rows.iter().map(|(&frame, row)| (frame, row))
    }

    /// Number of per-cluster values in each row, if any row exists.
    pub fn width(&self) -> Option<usize> {
        self.rows.values().next().map(|row| row.values.len())
    }

    /// Check that every row carries at least one value and all rows agree
    /// on their length.
    pub fn validate(&self) -> Result<(), SimCalcError> {
        let Some(expected) = self.width() else {
            return Ok(());
        };
        for (&frame, row) in &self.rows {
            if row.values.is_empty() {
                return Err(SimCalcError::InconsistentRow {
                    frame,
                    detail: "row has no cluster values".to_string(),
                });
            }
            if row.values.len() != expected {
                return Err(SimCalcError::InconsistentRow {
                    frame,
                    detail: format!("expected {expected} values, found {}", row.values.len()),
                });
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, SimCalcError> {
        let raw: BTreeMap<String, Vec<Option<f64>>> = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    pub fn to_json_string(&self) -> Result<String, SimCalcError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn load_json(path: &Path) -> Result<Self, SimCalcError> {
        let text = fs::read_to_string(path).map_err(|source| SimCalcError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mapping = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), frames = mapping.len(), "mapping_loaded");
        Ok(mapping)
    }

    pub fn save_json(&self, path: &Path) -> Result<(), SimCalcError> {
        let json = self.to_json_string()?;
        fs::write(path, json).map_err(|source| SimCalcError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), frames = self.len(), "mapping_saved");
        Ok(())
    }

    // JSON has no NaN, so serde_json writes it as null; read null back as NaN.
    fn from_raw(raw: BTreeMap<String, Vec<Option<f64>>>) -> Result<Self, SimCalcError> {
        let mut mapping = Self::new();
        for (label, flat) in raw {
            let FrameLabel(frame) = label.parse::<FrameLabel>()?;
            let mut values: Vec<f64> = flat.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
            let Some(average) = values.pop() else {
                return Err(SimCalcError::InconsistentRow {
                    frame,
                    detail: "row is empty".to_string(),
                });
            };
            mapping.insert(frame, SimilarityRow { values, average });
        }
        mapping.validate()?;
        Ok(mapping)
    }
}

impl Serialize for SimilarityMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for (&frame, row) in &self.rows {
            map.serialize_entry(&FrameLabel(frame).to_string(), &row.to_flat())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SimilarityMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Vec<Option<f64>>>::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(D::Error::custom)
    }
}

impl FromIterator<(usize, SimilarityRow)> for SimilarityMapping {
    fn from_iter<I: IntoIterator<Item = (usize, SimilarityRow)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
