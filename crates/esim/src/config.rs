//! Parameter and error types for extended similarity.
//!
//! Everything here is plain data: the counter engine and index formulas are a
//! pure function of `(column sums, object count, parameters)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coincidence threshold separating "similar" columns from "dissimilar" ones.
///
/// A column with sum `c` over `n` objects has margin `|2c - n|`. Columns whose
/// margin exceeds the threshold count towards `a` or `d`; the rest are
/// dissimilar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CThreshold {
    /// `n % 2`: the tightest threshold that still separates the classes.
    #[default]
    Auto,
    /// `ceil(n / 2)`.
    Dissimilar,
    /// Absolute count. Must be smaller than `n`; zero behaves like `Auto`.
    Count(usize),
    /// Fraction of `n`. Must be smaller than 1; zero behaves like `Auto`.
    Fraction(f64),
}

impl CThreshold {
    /// Resolve the threshold for `n_objects` fingerprints.
    pub fn resolve(&self, n_objects: usize) -> Result<f64, EsimError> {
        let auto = (n_objects % 2) as f64;
        match *self {
            CThreshold::Auto => Ok(auto),
            CThreshold::Dissimilar => Ok(n_objects.div_ceil(2) as f64),
            CThreshold::Count(0) => Ok(auto),
            CThreshold::Count(count) => {
                if count >= n_objects {
                    return Err(EsimError::ThresholdOutOfRange {
                        threshold: count as f64,
                        n_objects,
                    });
                }
                Ok(count as f64)
            }
            CThreshold::Fraction(frac) => {
                if frac == 0.0 {
                    return Ok(auto);
                }
                if !(0.0..1.0).contains(&frac) {
                    return Err(EsimError::ThresholdOutOfRange {
                        threshold: frac,
                        n_objects,
                    });
                }
                Ok(frac * n_objects as f64)
            }
        }
    }
}

/// Weighting applied to each column according to how lopsided its margin is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", content = "base", rename_all = "snake_case")]
pub enum WFactor {
    /// Linear in the margin: similar columns weigh `|m| / n`.
    #[default]
    Fraction,
    /// Exponential decay with the given base.
    Power(u32),
    /// Every column weighs 1.
    Unweighted,
}

impl WFactor {
    /// Weight of a column counted as similar (`a` or `d`).
    #[inline]
    pub(crate) fn similar(&self, margin: f64, n_objects: usize) -> f64 {
        let n = n_objects as f64;
        match *self {
            WFactor::Fraction => margin / n,
            WFactor::Power(base) => (base as f64).powf(-(n - margin)),
            WFactor::Unweighted => 1.0,
        }
    }

    /// Weight of a column counted as dissimilar.
    #[inline]
    pub(crate) fn dissimilar(&self, margin: f64, n_objects: usize) -> f64 {
        let n = n_objects as f64;
        let parity = (n_objects % 2) as f64;
        match *self {
            WFactor::Fraction => 1.0 - (margin - parity) / n,
            WFactor::Power(base) => (base as f64).powf(-(margin - parity)),
            WFactor::Unweighted => 1.0,
        }
    }
}

/// Whether an index is computed from weighted or unweighted denominators.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum WeightScheme {
    #[default]
    #[serde(rename = "nw")]
    NonWeighted,
    #[serde(rename = "w")]
    Weighted,
}

impl WeightScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightScheme::NonWeighted => "nw",
            WeightScheme::Weighted => "w",
        }
    }
}

impl fmt::Display for WeightScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightScheme {
    type Err = EsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nw" => Ok(WeightScheme::NonWeighted),
            "w" => Ok(WeightScheme::Weighted),
            other => Err(EsimError::UnknownWeightScheme(other.to_string())),
        }
    }
}

/// Extended similarity formula.
///
/// AC: Austin-Colwell, BUB: Baroni-Urbani-Buser, CTn: Consoni-Todeschini,
/// Fai: Faith, Gle: Gleason, Ja: Jaccard, Ja0: Jaccard 0-variant,
/// JT: Jaccard-Tanimoto, RT: Rogers-Tanimoto, RR: Russell-Rao,
/// SM: Sokal-Michener (simple matching), SSn: Sokal-Sneath.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum NAry {
    AC,
    BUB,
    CT1,
    CT2,
    CT3,
    CT4,
    Fai,
    Gle,
    Ja,
    Ja0,
    JT,
    RT,
    #[default]
    RR,
    SM,
    SS1,
    SS2,
}

impl NAry {
    pub const ALL: [NAry; 16] = [
        NAry::AC,
        NAry::BUB,
        NAry::CT1,
        NAry::CT2,
        NAry::CT3,
        NAry::CT4,
        NAry::Fai,
        NAry::Gle,
        NAry::Ja,
        NAry::Ja0,
        NAry::JT,
        NAry::RT,
        NAry::RR,
        NAry::SM,
        NAry::SS1,
        NAry::SS2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NAry::AC => "AC",
            NAry::BUB => "BUB",
            NAry::CT1 => "CT1",
            NAry::CT2 => "CT2",
            NAry::CT3 => "CT3",
            NAry::CT4 => "CT4",
            NAry::Fai => "Fai",
            NAry::Gle => "Gle",
            NAry::Ja => "Ja",
            NAry::Ja0 => "Ja0",
            NAry::JT => "JT",
            NAry::RT => "RT",
            NAry::RR => "RR",
            NAry::SM => "SM",
            NAry::SS1 => "SS1",
            NAry::SS2 => "SS2",
        }
    }

    /// Only Russell-Rao and simple matching have a direct pairwise form.
    pub fn supports_pairwise(&self) -> bool {
        matches!(self, NAry::RR | NAry::SM)
    }
}

impl fmt::Display for NAry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NAry {
    type Err = EsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAry::ALL
            .iter()
            .copied()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| EsimError::UnknownIndex(s.to_string()))
    }
}

/// Errors returned by the similarity engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EsimError {
    #[error("n_objects must be >= 1")]
    NoObjects,

    #[error("cannot compute similarity over empty data")]
    EmptyData,

    #[error("no columns were compared (p == 0)")]
    NoComparedColumns,

    #[error("c_threshold {threshold} out of range for {n_objects} objects")]
    ThresholdOutOfRange { threshold: f64, n_objects: usize },

    #[error("activation threshold must be finite (got {0})")]
    InvalidActivationThreshold(f64),

    #[error("trim fraction must be in [0, 1) (got {0})")]
    InvalidTrimFraction(f64),

    #[error("index {0} has no pairwise form; use RR or SM")]
    UnsupportedPairwiseIndex(NAry),

    #[error("unknown similarity index '{0}'")]
    UnknownIndex(String),

    #[error("unknown weight scheme '{0}'; expected 'nw' or 'w'")]
    UnknownWeightScheme(String),
}
