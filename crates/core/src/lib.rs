//! # Segreg Core
//!
//! Core types, traits and I/O for the Segreg segregation-analysis library.
//!
//! This crate provides:
//! - `Unit` / `UnitLayer`: spatial units with projected centroids
//! - `PopulationMatrix` / `LocalityMatrix`: per-unit, per-group counts
//! - `ResultTable` / `GlobalSummary`: what an analysis produces
//! - Algorithm trait for consistent API
//! - I/O for delimited unit tables and results

pub mod error;
pub mod io;
pub mod table;
pub mod vector;

pub use error::{Error, Result};
pub use table::{GlobalSummary, ResultTable};
pub use vector::{GroupCounts, LocalityMatrix, PopulationMatrix, Unit, UnitLayer};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::table::{GlobalSummary, ResultTable};
    pub use crate::vector::{GroupCounts, LocalityMatrix, PopulationMatrix, Unit, UnitLayer};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in Segreg.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
