//! Which counts a measure reads, and the shared zero-substitution rule

use ndarray::ArrayView2;
use segreg_core::{GroupCounts, LocalityMatrix, PopulationMatrix};

/// Counts a measure is evaluated on.
///
/// Non-spatial measures read the raw population; spatial measures read the
/// locality matrix. Several measures still normalise by raw population
/// totals in spatial mode, so `Smoothed` carries both.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    Raw(&'a PopulationMatrix),
    Smoothed {
        population: &'a PopulationMatrix,
        locality: &'a LocalityMatrix,
    },
}

impl<'a> Source<'a> {
    /// Counts the measure is evaluated on
    pub fn counts(&self) -> ArrayView2<'a, f64> {
        match *self {
            Source::Raw(population) => population.counts(),
            Source::Smoothed { locality, .. } => locality.counts(),
        }
    }

    /// Raw population, whatever the mode
    pub fn population(&self) -> &'a PopulationMatrix {
        match *self {
            Source::Raw(population) => population,
            Source::Smoothed { population, .. } => population,
        }
    }

    pub fn is_spatial(&self) -> bool {
        matches!(self, Source::Smoothed { .. })
    }

    pub fn n_units(&self) -> usize {
        self.population().n_units()
    }

    pub fn n_groups(&self) -> usize {
        self.population().n_groups()
    }
}

/// Map NaN and ±Inf to zero.
#[inline]
pub(crate) fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// `num / den`, with non-finite results (0/0, x/0) replaced by zero.
#[inline]
pub(crate) fn ratio(num: f64, den: f64) -> f64 {
    finite_or_zero(num / den)
}
