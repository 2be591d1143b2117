//! # Segreg Algorithms
//!
//! Spatial and non-spatial segregation measures for Segreg.
//!
//! ## Available Algorithm Categories
//!
//! - **spatial**: Distance-weighting kernels, k-d tree, locality estimation
//! - **segregation**: Dissimilarity, exposure/isolation, entropy, index H,
//!   result assembly and the analysis session

mod maybe_rayon;

pub mod segregation;
pub mod spatial;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::segregation::{
        assemble, labels_for, GlobalValue, LocalValues, MeasureKind, MeasureResult, Mode, Scope,
        Session, Source,
    };
    pub use crate::spatial::{
        estimate_locality, kernel_weights, KernelKind, LocalityEstimation, LocalityParams,
    };
    pub use segreg_core::prelude::*;
}
