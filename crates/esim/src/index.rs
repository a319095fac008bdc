//! Extended similarity indices computed from [`Counters`].

use std::collections::BTreeMap;
use std::f64::consts::PI;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::config::{CThreshold, EsimError, NAry, WFactor, WeightScheme};
use crate::counters::{calculate_counters, Counters};

/// Every index value for one group, under both weighting schemes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimIndices {
    pub nw: BTreeMap<NAry, f64>,
    pub w: BTreeMap<NAry, f64>,
}

impl SimIndices {
    /// Build the full table from precomputed counters.
    pub fn from_counters(c: &Counters) -> Self {
        let nw = NAry::ALL
            .iter()
            .map(|&n| (n, non_weighted(c, n)))
            .collect();
        let w = NAry::ALL.iter().map(|&n| (n, weighted(c, n))).collect();
        Self { nw, w }
    }

    pub fn get(&self, weight: WeightScheme, n_ary: NAry) -> f64 {
        let table = match weight {
            WeightScheme::NonWeighted => &self.nw,
            WeightScheme::Weighted => &self.w,
        };
        // Both tables are filled from `NAry::ALL`.
        table.get(&n_ary).copied().unwrap_or(f64::NAN)
    }
}

/// Compute every (weight scheme, index) combination for one column-sum vector.
pub fn gen_sim_dict(
    c_total: ArrayView1<'_, f64>,
    n_objects: usize,
    c_threshold: CThreshold,
    w_factor: WFactor,
) -> Result<SimIndices, EsimError> {
    let counters = calculate_counters(c_total, n_objects, c_threshold, w_factor)?;
    Ok(SimIndices::from_counters(&counters))
}

/// Single index value, skipping the table for the hot loops.
pub fn sim_index(
    c_total: ArrayView1<'_, f64>,
    n_objects: usize,
    n_ary: NAry,
    weight: WeightScheme,
) -> Result<f64, EsimError> {
    let counters =
        calculate_counters(c_total, n_objects, CThreshold::Auto, WFactor::Fraction)?;
    Ok(match weight {
        WeightScheme::NonWeighted => non_weighted(&counters, n_ary),
        WeightScheme::Weighted => weighted(&counters, n_ary),
    })
}

/// Pairwise form of an index over raw counts: `RR = a / p`,
/// `SM = (a + d) / p`.
pub fn pair_similarity(counters: &Counters, n_ary: NAry) -> Result<f64, EsimError> {
    if counters.p == 0 {
        return Err(EsimError::NoComparedColumns);
    }
    let p = counters.p as f64;
    match n_ary {
        NAry::RR => Ok(counters.a as f64 / p),
        NAry::SM => Ok((counters.a + counters.d) as f64 / p),
        other => Err(EsimError::UnsupportedPairwiseIndex(other)),
    }
}

fn weighted(c: &Counters, n_ary: NAry) -> f64 {
    let (w_a, w_d) = (c.w_a, c.w_d);
    let (w_sim, w_dis, w_p) = (c.total_w_sim, c.total_w_dis, c.w_p);
    match n_ary {
        NAry::AC => (2.0 / PI) * (w_sim / w_p).sqrt().asin(),
        NAry::BUB => ((w_a * w_d).sqrt() + w_a) / ((w_a * w_d).sqrt() + w_a + w_dis),
        NAry::CT1 => (1.0 + w_a + w_d).ln() / (1.0 + w_p).ln(),
        NAry::CT2 => ((1.0 + w_p).ln() - (1.0 + w_dis).ln()) / (1.0 + w_p).ln(),
        NAry::CT3 => (1.0 + w_a).ln() / (1.0 + w_p).ln(),
        NAry::CT4 => (1.0 + w_a).ln() / (1.0 + w_a + w_dis).ln(),
        NAry::Fai => (w_a + 0.5 * w_d) / w_p,
        NAry::Gle => (2.0 * w_a) / (2.0 * w_a + w_dis),
        NAry::Ja => (3.0 * w_a) / (3.0 * w_a + w_dis),
        NAry::Ja0 => (3.0 * w_sim) / (3.0 * w_sim + w_dis),
        NAry::JT => w_a / (w_a + w_dis),
        NAry::RT => w_sim / (w_p + w_dis),
        NAry::RR => w_a / w_p,
        NAry::SM => w_sim / w_p,
        NAry::SS1 => w_a / (w_a + 2.0 * w_dis),
        NAry::SS2 => (2.0 * w_sim) / (w_p + w_sim),
    }
}

// Weighted numerators over unweighted denominators.
fn non_weighted(c: &Counters, n_ary: NAry) -> f64 {
    let (w_a, w_d, w_sim, w_dis, w_p) = (c.w_a, c.w_d, c.total_w_sim, c.total_w_dis, c.w_p);
    let a = c.a as f64;
    let d = c.d as f64;
    let sim = c.total_sim as f64;
    let dis = c.total_dis as f64;
    let p = c.p as f64;
    match n_ary {
        NAry::AC => (2.0 / PI) * (w_sim / p).sqrt().asin(),
        NAry::BUB => ((w_a * w_d).sqrt() + w_a) / ((a * d).sqrt() + a + dis),
        NAry::CT1 => (1.0 + w_a + w_d).ln() / (1.0 + p).ln(),
        NAry::CT2 => ((1.0 + w_p).ln() - (1.0 + w_dis).ln()) / (1.0 + p).ln(),
        NAry::CT3 => (1.0 + w_a).ln() / (1.0 + p).ln(),
        NAry::CT4 => (1.0 + w_a).ln() / (1.0 + a + dis).ln(),
        NAry::Fai => (w_a + 0.5 * w_d) / p,
        NAry::Gle => (2.0 * w_a) / (2.0 * a + dis),
        NAry::Ja => (3.0 * w_a) / (3.0 * a + dis),
        NAry::Ja0 => (3.0 * w_sim) / (3.0 * sim + dis),
        NAry::JT => w_a / (a + dis),
        NAry::RT => w_sim / (p + dis),
        NAry::RR => w_a / p,
        NAry::SM => w_sim / p,
        NAry::SS1 => w_a / (a + 2.0 * dis),
        NAry::SS2 => (2.0 * w_sim) / (p + sim),
    }
}
