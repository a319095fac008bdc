//! File names for similarity mappings and the output record.
//!
//! `{w_}{stem}_{n_ary}{_tNN}.txt`: `w_` when similarities are weighted by
//! frames, `stem` the method or output name, `_tNN` the trim fraction as a
//! truncated percentage when trimming.

use std::fmt;
use std::str::FromStr;

use esim::NAry;
use once_cell::sync::Lazy;
use regex::Regex;
use simcalc::Method;

use crate::RepFrameError;

static SIM_FILE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(w_)?(.+?)_([A-Za-z0-9]+?)(?:_t(\d+))?\.txt$").expect("file name pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimFileName {
    pub weighted: bool,
    pub stem: String,
    pub n_ary: NAry,
    /// Trim percentage, `None` when not trimming.
    pub trim_percent: Option<u32>,
}

impl SimFileName {
    /// Name of the mapping file for `method`.
    pub fn mapping(method: Method, n_ary: NAry, weighted: bool, trim_frac: Option<f64>) -> Self {
        Self::new(method.as_str(), n_ary, weighted, trim_frac)
    }

    /// Name of the representative-frame record.
    pub fn output(output_name: &str, n_ary: NAry, weighted: bool, trim_frac: Option<f64>) -> Self {
        Self::new(output_name, n_ary, weighted, trim_frac)
    }

    fn new(stem: &str, n_ary: NAry, weighted: bool, trim_frac: Option<f64>) -> Self {
        Self {
            weighted,
            stem: stem.to_string(),
            n_ary,
            trim_percent: trim_percent(trim_frac),
        }
    }

    /// The method this file holds, if the stem names one.
    pub fn method(&self) -> Option<Method> {
        self.stem.parse().ok()
    }
}

/// `trunc(trim_frac * 100)`; zero or absent means no suffix.
pub fn trim_percent(trim_frac: Option<f64>) -> Option<u32> {
    match trim_frac {
        Some(f) if f != 0.0 => Some((f * 100.0) as u32),
        _ => None,
    }
}

impl fmt::Display for SimFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.weighted {
            f.write_str("w_")?;
        }
        write!(f, "{}_{}", self.stem, self.n_ary)?;
        if let Some(t) = self.trim_percent {
            write!(f, "_t{t}")?;
        }
        f.write_str(".txt")
    }
}

impl FromStr for SimFileName {
    type Err = RepFrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RepFrameError::MalformedFileName(s.to_string());
        let caps = SIM_FILE_NAME.captures(s).ok_or_else(malformed)?;
        let n_ary = caps[3].parse::<NAry>().map_err(|_| malformed())?;
        let trim_percent = match caps.get(4) {
            Some(t) => Some(t.as_str().parse::<u32>().map_err(|_| malformed())?),
            None => None,
        };
        Ok(Self {
            weighted: caps.get(1).is_some(),
            stem: caps[2].to_string(),
            n_ary,
            trim_percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_names() {
        assert_eq!(
            SimFileName::mapping(Method::Pairwise, NAry::RR, true, Some(0.1)).to_string(),
            "w_pairwise_RR_t10.txt"
        );
        assert_eq!(
            SimFileName::mapping(Method::Union, NAry::SM, false, None).to_string(),
            "union_SM.txt"
        );
        assert_eq!(
            SimFileName::mapping(Method::Outlier, NAry::RR, false, Some(0.0)).to_string(),
            "outlier_RR.txt"
        );
    }

    #[test]
    fn output_name() {
        assert_eq!(
            SimFileName::output("rep", NAry::RR, true, Some(0.2)).to_string(),
            "w_rep_RR_t20.txt"
        );
    }

    #[test]
    fn trim_percent_truncates() {
        assert_eq!(trim_percent(Some(0.25)), Some(25));
        assert_eq!(trim_percent(Some(0.999)), Some(99));
        assert_eq!(trim_percent(Some(0.05)), Some(5));
        assert_eq!(trim_percent(None), None);
    }

    #[test]
    fn parses_back() {
        for name in ["w_pairwise_RR_t10.txt", "union_SM.txt", "w_my_rep_RR.txt", "medoid_RR_t5.txt"] {
            let parsed: SimFileName = name.parse().unwrap();
            assert_eq!(parsed.to_string(), name);
        }

        let parsed: SimFileName = "w_my_rep_SM_t30.txt".parse().unwrap();
        assert!(parsed.weighted);
        assert_eq!(parsed.stem, "my_rep");
        assert_eq!(parsed.n_ary, NAry::SM);
        assert_eq!(parsed.trim_percent, Some(30));
        assert_eq!(parsed.method(), None);

        let mapping: SimFileName = "pairwise_RR.txt".parse().unwrap();
        assert_eq!(mapping.method(), Some(Method::Pairwise));
    }

    #[test]
    fn rejects_malformed_names() {
        for bad in ["pairwise.txt", "pairwise_XX.txt", "pairwise_RR.json", "_RR.txt"] {
            assert!(
                matches!(bad.parse::<SimFileName>(), Err(RepFrameError::MalformedFileName(_))),
                "{bad} should be rejected"
            );
        }
    }
}
