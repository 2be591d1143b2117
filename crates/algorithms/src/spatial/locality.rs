//! Locality (population intensity) estimation
//!
//! Smooths the population matrix over space: each unit's intensity for a
//! group is the kernel-weighted average of that group's counts over all
//! units, itself included.
//!
//! ```text
//! intensity[i,g] = Σ_j w(d_ij) * pop[j,g] / Σ_j w(d_ij)
//! ```
//!
//! The weight row of unit `i` depends only on `i` and the kernel, so it is
//! computed once per unit and shared by every group: O(n² + n·m) work
//! instead of O(n²·m).

use std::time::Instant;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::maybe_rayon::*;
use crate::segregation::ratio;
use segreg_core::{Algorithm, Error, GroupCounts, LocalityMatrix, Result, UnitLayer};

use super::kdtree::KdTree;
use super::kernel::{validate_bandwidth, KernelKind};

/// Parameters for locality estimation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalityParams {
    /// Neighbourhood radius, in the same linear units as the coordinates
    pub bandwidth: f64,
    /// Distance-weighting kernel
    pub kernel: KernelKind,
    /// Use a k-d tree to skip units beyond the bandwidth when the kernel
    /// is compact. Ignored for Gaussian.
    pub pruning: bool,
}

impl Default for LocalityParams {
    fn default() -> Self {
        Self {
            bandwidth: 1000.0,
            kernel: KernelKind::Gaussian,
            pruning: true,
        }
    }
}

/// Locality estimation algorithm
#[derive(Debug, Clone, Default)]
pub struct LocalityEstimation;

impl Algorithm for LocalityEstimation {
    type Input = UnitLayer;
    type Output = LocalityMatrix;
    type Params = LocalityParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Locality"
    }

    fn description(&self) -> &'static str {
        "Kernel-weighted population intensity of every group around each unit"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        estimate_locality(&input, &params)
    }
}

/// Estimate the locality matrix of a unit layer.
///
/// # Errors
/// * [`Error::EmptyInput`] if the layer has no units
/// * [`Error::InvalidBandwidth`] if `bandwidth <= 0` or not finite
pub fn estimate_locality(layer: &UnitLayer, params: &LocalityParams) -> Result<LocalityMatrix> {
    validate_bandwidth(params.bandwidth)?;
    if layer.is_empty() {
        return Err(Error::EmptyInput);
    }

    let start = Instant::now();
    let n = layer.len();
    let m = layer.n_groups();
    let pruned = params.pruning && params.kernel.is_compact();
    let tree = pruned.then(|| KdTree::build(layer.units()));

    let rows: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| match &tree {
            Some(tree) => pruned_intensity(layer, tree, i, params),
            None => full_intensity(layer, i, params),
        })
        .collect();

    let data = Array2::from_shape_vec((n, m), rows.into_iter().flatten().collect())
        .map_err(|e| Error::Other(e.to_string()))?;

    debug!(
        units = n,
        groups = m,
        bandwidth = params.bandwidth,
        kernel = %params.kernel,
        pruned,
        elapsed = ?start.elapsed(),
        "estimated locality"
    );

    Ok(LocalityMatrix::new(data))
}

/// Intensity of unit `i` scanning every unit.
fn full_intensity(layer: &UnitLayer, i: usize, params: &LocalityParams) -> Vec<f64> {
    let units = layer.units();
    let origin = &units[i];
    let distances: Vec<f64> = units.iter().map(|u| origin.dist(u)).collect();
    let weights = params.kernel.weights(&distances, params.bandwidth);

    weighted_average(layer, weights.iter().copied().enumerate())
}

/// Intensity of unit `i` over the units inside the bandwidth only.
///
/// The tree only preselects candidates; weights use the same distance as
/// [`full_intensity`].
fn pruned_intensity(layer: &UnitLayer, tree: &KdTree, i: usize, params: &LocalityParams) -> Vec<f64> {
    let units = layer.units();
    let origin = &units[i];
    let neighbors = tree.within_radius(origin.x, origin.y, params.bandwidth);

    weighted_average(
        layer,
        neighbors.iter().map(|nb| {
            let d = origin.dist(&units[nb.index]);
            (nb.index, params.kernel.weight(d, params.bandwidth))
        }),
    )
}

/// Σ_j w_j * pop[j,·] / Σ_j w_j over `(j, w_j)` pairs.
fn weighted_average(layer: &UnitLayer, weights: impl Iterator<Item = (usize, f64)>) -> Vec<f64> {
    let population = layer.population();
    let mut acc = vec![0.0; layer.n_groups()];
    let mut weight_sum = 0.0;

    for (j, w) in weights {
        if w == 0.0 {
            continue;
        }
        weight_sum += w;
        for (a, &p) in acc.iter_mut().zip(population.unit(j).iter()) {
            *a += w * p;
        }
    }

    for a in acc.iter_mut() {
        *a = ratio(*a, weight_sum);
    }
    acc
}
