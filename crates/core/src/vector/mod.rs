//! Vector data: spatial units and their per-group counts
//!
//! - [`Unit`]: one observation (id + projected centroid)
//! - [`PopulationMatrix`]: raw `n_units × n_groups` counts
//! - [`LocalityMatrix`]: spatially smoothed counts of the same shape
//! - [`UnitLayer`]: validated bundle of units and population

mod matrix;
mod unit;

pub use matrix::{GroupCounts, LocalityMatrix, PopulationMatrix};
pub use unit::{Unit, UnitLayer};
