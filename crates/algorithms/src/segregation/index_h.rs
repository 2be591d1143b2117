//! Entropy index H (Theil)
//!
//! Each unit's share of the region's diversity loss, built on the entropy
//! measures:
//!
//! ```text
//! T     = Σ_i t[i]                  t[i] = Σ_g c[i,g]
//! h[i]  = t[i] · (E - e[i]) / (E · T)
//! H     = Σ_i h[i]
//! ```
//!
//! A region with no diversity (`E = 0`) has nothing to explain: every
//! `h[i]` is 0.
//!
//! Reference:
//! Theil, H. & Finizza, A.J. (1971). A note on the measurement of racial
//! integration of schools by means of informational concepts. Journal of
//! Mathematical Sociology, 1(2).

use ndarray::{Array1, Axis};

use super::source::{finite_or_zero, Source};

/// Per-unit contribution to index H.
///
/// `local_entropy` and `global_entropy` must come from the same source.
pub fn local_index_h(source: Source<'_>, local_entropy: &Array1<f64>, global_entropy: f64) -> Array1<f64> {
    let unit_totals = source.counts().sum_axis(Axis(1));
    let et = global_entropy * unit_totals.sum();

    if et == 0.0 || !et.is_finite() {
        return Array1::zeros(unit_totals.len());
    }

    unit_totals
        .iter()
        .zip(local_entropy.iter())
        .map(|(&t, &e)| finite_or_zero(t * (global_entropy - e) / et))
        .collect()
}

/// Regional index H: the sum of the local contributions.
pub fn global_index_h(local: &Array1<f64>) -> f64 {
    local.iter().sum()
}
