//! Dissimilarity index (Duncan & Duncan D, multi-group form)
//!
//! Measures how unevenly groups are spread across units relative to their
//! regional shares:
//!
//! ```text
//! tjm[i,g] = c[i,g] / Σ_g c[i,g]          composition of unit i
//! tm[g]    = P[·,g] / P                   regional share (raw counts)
//! I        = Σ_g tm[g] (1 - tm[g])
//! d[i]     = Σ_g |tjm[i,g] - tm[g]| · P[i,·] / (2 · P · I)
//! D        = Σ_i d[i]
//! ```
//!
//! `c` is the active source (population or locality); `P` is always the
//! raw population. Non-finite values become 0.
//!
//! Reference:
//! Duncan, O.D. & Duncan, B. (1955). A methodological analysis of
//! segregation indexes. American Sociological Review, 20(2).

use ndarray::{Array1, Axis};
use segreg_core::GroupCounts;

use super::source::{finite_or_zero, ratio, Source};

/// Per-unit contribution to the dissimilarity index.
pub fn local_dissimilarity(source: Source<'_>) -> Array1<f64> {
    let counts = source.counts();
    let population = source.population();

    let pop_total = population.total();
    let tm: Array1<f64> = population.column_totals().mapv(|t| ratio(t, pop_total));
    let index: f64 = tm.iter().map(|&t| t * (1.0 - t)).sum();
    let denom = 2.0 * pop_total * index;
    let pop_row_totals = population.row_totals();

    counts
        .axis_iter(Axis(0))
        .zip(pop_row_totals.iter())
        .map(|(row, &row_pop)| {
            let lj = row.sum();
            let spread: f64 = row
                .iter()
                .zip(tm.iter())
                .map(|(&c, &t)| (ratio(c, lj) - t).abs())
                .sum();
            finite_or_zero(spread * row_pop / denom)
        })
        .collect()
}

/// Regional dissimilarity: the sum of the local contributions.
pub fn global_dissimilarity(local: &Array1<f64>) -> f64 {
    local.iter().sum()
}
