//! Spatial weighting over unit centroids
//!
//! - **kernel**: Gaussian, bi-square and moving-window distance weights
//! - **kdtree**: fixed-radius neighbour search for compact kernels
//! - **locality**: kernel-smoothed population intensity per unit and group

mod kdtree;
mod kernel;
mod locality;

pub use kdtree::{KdTree, Neighbor};
pub use kernel::{kernel_weights, validate_bandwidth, KernelKind};
pub use locality::{estimate_locality, LocalityEstimation, LocalityParams};
