//! Exposure and isolation indices (P*)
//!
//! Probability that a member of group `g` shares its unit with a member of
//! group `h`; for `g == h` this is isolation.
//!
//! ```text
//! share[i,g] = P[i,g] / Σ_i P[i,g]         g's population located at i
//! rate[i,h]  = c[i,h] / Σ_h c[i,h]         composition of unit i
//! e[i,g,h]   = share[i,g] · rate[i,h]
//! E[g,h]     = Σ_i e[i,g,h]
//! ```
//!
//! `share` uses raw population in both modes; `rate` uses the active
//! source. Smoothing therefore changes only the composition a group is
//! exposed to, not where the group lives. Reading `c[i,g]` in `share` as
//! well would be the plain P* of the smoothed counts; that is not what is
//! computed here. Local values are stored as an `n_units × n_groups²` matrix,
//! column `g * n_groups + h`.
//!
//! Reference:
//! Lieberson, S. (1981). An asymmetrical approach to segregation. In
//! Ethnic Segregation in Cities.

use ndarray::{Array2, Axis};
use segreg_core::GroupCounts;

use super::source::{finite_or_zero, ratio, Source};

/// Column of `(g, h)` in the local exposure matrix.
#[inline]
pub fn exposure_column(g: usize, h: usize, n_groups: usize) -> usize {
    g * n_groups + h
}

/// Per-unit exposure of every group pair, `n_units × n_groups²`.
pub fn local_exposure(source: Source<'_>) -> Array2<f64> {
    let counts = source.counts();
    let population = source.population();
    let pop = population.counts();
    let n = source.n_units();
    let m = source.n_groups();

    let group_totals = population.column_totals();
    let unit_totals = counts.sum_axis(Axis(1));

    Array2::from_shape_fn((n, m * m), |(i, k)| {
        let (g, h) = (k / m, k % m);
        let share = ratio(pop[(i, g)], group_totals[g]);
        let rate = ratio(counts[(i, h)], unit_totals[i]);
        finite_or_zero(share * rate)
    })
}

/// Regional `n_groups × n_groups` exposure matrix from the local values.
///
/// Entry `(g, h)` is the sum over units of local column `g * n_groups + h`,
/// accumulated in unit order.
pub fn global_exposure(local: &Array2<f64>, n_groups: usize) -> Array2<f64> {
    let mut sums = vec![0.0; local.ncols()];
    for row in local.rows() {
        for (s, &v) in sums.iter_mut().zip(row.iter()) {
            *s += v;
        }
    }
    Array2::from_shape_fn((n_groups, n_groups), |(g, h)| {
        sums[exposure_column(g, h, n_groups)]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use segreg_core::{LocalityMatrix, PopulationMatrix};

    #[test]
    fn test_complete_segregation() {
        let pop = PopulationMatrix::new(array![[10.0, 0.0], [0.0, 10.0]]);
        let local = local_exposure(Source::Raw(&pop));
        assert_eq!(local.dim(), (2, 4));

        let global = global_exposure(&local, 2);
        assert_eq!(global, array![[1.0, 0.0], [0.0, 1.0]]);
    }

    #[test]
    fn test_even_mix() {
        let pop = PopulationMatrix::new(array![[30.0, 10.0], [15.0, 5.0]]);
        let global = global_exposure(&local_exposure(Source::Raw(&pop)), 2);
        // every unit is 75% / 25%
        assert_relative_eq!(global[(0, 0)], 0.75, epsilon = 1e-12);
        assert_relative_eq!(global[(0, 1)], 0.25, epsilon = 1e-12);
        assert_relative_eq!(global[(1, 0)], 0.75, epsilon = 1e-12);
        assert_relative_eq!(global[(1, 1)], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_rows_of_global_sum_to_one() {
        let pop = PopulationMatrix::new(array![[3.0, 1.0, 0.0], [2.0, 2.0, 6.0], [0.0, 9.0, 1.0]]);
        let global = global_exposure(&local_exposure(Source::Raw(&pop)), 3);
        for g in 0..3 {
            assert_relative_eq!(global.row(g).sum(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_column_layout() {
        let pop = PopulationMatrix::new(array![[1.0, 3.0], [1.0, 0.0]]);
        let local = local_exposure(Source::Raw(&pop));
        // unit 0, g = 1, h = 0: share 3/3 = 1, rate 1/4
        assert_relative_eq!(local[(0, exposure_column(1, 0, 2))], 0.25, epsilon = 1e-15);
        // unit 0, g = 0, h = 1: share 1/2, rate 3/4
        assert_relative_eq!(local[(0, exposure_column(0, 1, 2))], 0.375, epsilon = 1e-15);
    }

    #[test]
    fn test_empty_group_and_unit_masked() {
        let pop = PopulationMatrix::new(array![[4.0, 0.0], [0.0, 0.0]]);
        let local = local_exposure(Source::Raw(&pop));
        assert!(local.iter().all(|v| v.is_finite()));
        assert_eq!(local.row(1).sum(), 0.0);
    }

    #[test]
    fn test_spatial_rate_from_locality() {
        let pop = PopulationMatrix::new(array![[10.0, 0.0], [0.0, 10.0]]);
        let loc = LocalityMatrix::new(array![[5.0, 5.0], [5.0, 5.0]]);
        let global = global_exposure(
            &local_exposure(Source::Smoothed {
                population: &pop,
                locality: &loc,
            }),
            2,
        );
        assert_eq!(global, array![[0.5, 0.5], [0.5, 0.5]]);
    }

    #[test]
    fn test_spatial_share_stays_on_raw_population() {
        let pop = PopulationMatrix::new(array![[10.0, 0.0], [0.0, 10.0]]);
        let loc = LocalityMatrix::new(array![[8.0, 2.0], [2.0, 8.0]]);
        let local = local_exposure(Source::Smoothed {
            population: &pop,
            locality: &loc,
        });
        // no member of group 0 lives in unit 1, whatever its smoothed mix
        assert_eq!(local[(1, exposure_column(0, 0, 2))], 0.0);
        assert_relative_eq!(local[(0, exposure_column(0, 0, 2))], 0.8, epsilon = 1e-15);
        assert_relative_eq!(global_exposure(&local, 2)[(0, 0)], 0.8, epsilon = 1e-15);
    }
}
