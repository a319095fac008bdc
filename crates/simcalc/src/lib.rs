//! # Similarity Calculator
//!
//! Builds a [`SimilarityMapping`] from a dominant cluster and a set of other
//! clusters: for each dominant frame, one similarity value per other cluster
//! plus their average.
//!
//! ## Modes
//!
//! - **pairwise**: mean of the pairwise similarity between the frame and
//!   every frame of the other cluster.
//! - **union**: n-ary similarity of the frame added to the whole cluster.
//! - **medoid** / **outlier**: pairwise similarity against the cluster's
//!   medoid or outlier frame.
//!
//! With `frame_weighted_sim` the values are scaled by the population share of
//! each cluster (see [`population_weights`]). [`max_frame`] then picks the
//! frame holding the largest value.
//!
//! ## Example Usage
//!
//! ```
//! use cluster::{Cluster, ClusterId};
//! use ndarray::array;
//! use simcalc::{max_frame, CalculatorConfig, SimilarityCalculator};
//!
//! let c0 = Cluster::new(ClusterId(0), array![[1.0, 0.0, 1.0], [1.0, 1.0, 1.0]]);
//! let c1 = Cluster::new(ClusterId(1), array![[1.0, 0.0, 1.0]]);
//!
//! let cfg = CalculatorConfig::new().with_frame_weighting(false);
//! let calc = SimilarityCalculator::new(c0, vec![c1], None, cfg).unwrap();
//! let mapping = calc.calculate_pairwise().unwrap();
//!
//! assert!((mapping.get(0).unwrap().values[0] - 2.0 / 3.0).abs() < 1e-12);
//! assert_eq!(max_frame(&mapping).unwrap(), 0);
//! ```
mod calculator;
mod mapping;
mod select;
mod types;
mod weighting;

pub use crate::calculator::SimilarityCalculator;
pub use crate::mapping::{SimilarityMapping, SimilarityRow};
pub use crate::select::max_frame;
pub use crate::types::{CalculatorConfig, Method, SimCalcError};
pub use crate::weighting::{population_weights, weight_mapping};
