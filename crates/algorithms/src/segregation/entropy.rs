//! Entropy (diversity) index
//!
//! Shannon entropy of the group composition of each unit and of the whole
//! region:
//!
//! ```text
//! p[i,g] = c[i,g] / Σ_g c[i,g]       e[i] = Σ_g p[i,g] ln(1 / p[i,g])
//! q[g]   = Σ_i c[i,g] / Σ c          E    = Σ_g q[g] ln(1 / q[g])
//! ```
//!
//! In spatial mode `c` is the locality matrix and proportions use each
//! unit's own locality total. Terms with `p = 0` contribute 0.

use ndarray::{Array1, ArrayView1, Axis};

use super::source::{finite_or_zero, Source};

/// Σ p ln(1/p) over the proportions of `counts`, zero terms dropped.
fn shannon(counts: ArrayView1<'_, f64>) -> f64 {
    let total = counts.sum();
    counts
        .iter()
        .map(|&c| {
            let p = c / total;
            finite_or_zero(p * (1.0 / p).ln())
        })
        .sum()
}

/// Entropy of each unit's composition.
pub fn local_entropy(source: Source<'_>) -> Array1<f64> {
    source.counts().axis_iter(Axis(0)).map(shannon).collect()
}

/// Entropy of the regional composition.
pub fn global_entropy(source: Source<'_>) -> f64 {
    shannon(source.counts().sum_axis(Axis(0)).view())
}
