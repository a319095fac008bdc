//! # Extended Similarity
//!
//! n-ary similarity over binary or continuous fingerprints. Instead of
//! comparing two vectors at a time, a whole group is summed column-wise and
//! each column is classified by how unanimous the group is.
//!
//! ## Contract
//!
//! - Inputs are already-normalized fingerprints (rows of an `ndarray`
//!   matrix); this crate never reads files or normalizes coordinates.
//! - Every function is a pure function of its arguments: no I/O, no clocks,
//!   no global state.
//!
//! Invariant: for the same column sums, object count and parameters, the
//! counters and indices are bit identical.
//!
//! ## Pipeline
//!
//! 0.  **Activation** ([`binarize`], optional): continuous rows are turned
//!     into active/inactive values at a cutoff before they are summed.
//!     Without it the raw values are summed and classified by margin.
//!
//! 1.  **Counters** ([`calculate_counters`]): each column of the column-sum
//!     vector lands in `a` (all active), `d` (all inactive) or the
//!     dissimilar bucket, with an optional [`WFactor`] weight.
//!
//! 2.  **Indices** ([`gen_sim_dict`], [`pair_similarity`]): counters are
//!     turned into a similarity value per [`NAry`] formula and
//!     [`WeightScheme`].
//!
//! 3.  **Selection** ([`calculate_medoid`], [`calculate_outlier`],
//!     [`trim_outliers`]): rows are ranked by complement similarity, the
//!     similarity of everything else in the cluster once the row is left out.
//!
//! ## Example Usage
//!
//! ```
//! use esim::{gen_sim_dict, CThreshold, NAry, WFactor, WeightScheme};
//! use ndarray::array;
//!
//! // [1, 0, 1] + [1, 0, 1]
//! let c_total = array![2.0, 0.0, 2.0];
//! let indices = gen_sim_dict(c_total.view(), 2, CThreshold::Auto, WFactor::Fraction).unwrap();
//!
//! let rr = indices.get(WeightScheme::NonWeighted, NAry::RR);
//! assert!((rr - 2.0 / 3.0).abs() < 1e-12);
//! ```
//!
pub mod activation;
pub mod config;
pub mod counters;
pub mod index;
pub mod medoid;
pub mod trim;

pub use crate::activation::{binarize, validate_activation_threshold};
pub use crate::config::{CThreshold, EsimError, NAry, WFactor, WeightScheme};
pub use crate::counters::{calculate_counters, Counters};
pub use crate::index::{gen_sim_dict, pair_similarity, sim_index, SimIndices};
pub use crate::medoid::{
    calculate_medoid, calculate_outlier, complement_similarities,
    complement_similarities_with_total,
};
pub use crate::trim::{trim_count, trim_indices, trim_outliers};
