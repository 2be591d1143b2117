//! Per-unit, per-group count matrices

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{Error, Result};

/// Read access shared by raw and smoothed count matrices.
///
/// Rows are spatial units, columns are groups.
pub trait GroupCounts {
    /// View of the underlying `n_units × n_groups` data
    fn counts(&self) -> ArrayView2<'_, f64>;

    /// Number of units (rows)
    fn n_units(&self) -> usize {
        self.counts().nrows()
    }

    /// Number of groups (columns)
    fn n_groups(&self) -> usize {
        self.counts().ncols()
    }

    /// Counts of a single unit
    fn unit(&self, i: usize) -> ArrayView1<'_, f64> {
        self.counts().index_axis_move(Axis(0), i)
    }

    /// Sum over groups for each unit
    fn row_totals(&self) -> Array1<f64> {
        self.counts().sum_axis(Axis(1))
    }

    /// Sum over units for each group
    fn column_totals(&self) -> Array1<f64> {
        self.counts().sum_axis(Axis(0))
    }

    /// Grand total over all units and groups
    fn total(&self) -> f64 {
        self.counts().sum()
    }
}

/// Replace negative (and NaN) entries with zero.
fn clamp_non_negative(data: &mut Array2<f64>) {
    data.mapv_inplace(|v| v.max(0.0));
}

fn from_rows(rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    let n_groups = rows.first().map(Vec::len).unwrap_or(0);
    let mut flat = Vec::with_capacity(rows.len() * n_groups);
    for row in rows {
        if row.len() != n_groups {
            return Err(Error::DimensionMismatch {
                what: "group columns",
                expected: n_groups,
                actual: row.len(),
            });
        }
        flat.extend_from_slice(row);
    }
    Array2::from_shape_vec((rows.len(), n_groups), flat).map_err(|e| Error::Other(e.to_string()))
}

/// Raw population counts (`n_units × n_groups`).
///
/// Negative inputs are clamped to zero on construction, so every value
/// read back is `>= 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationMatrix {
    data: Array2<f64>,
}

impl PopulationMatrix {
    /// Wrap an existing array, clamping negatives to zero
    pub fn new(mut data: Array2<f64>) -> Self {
        clamp_non_negative(&mut data);
        Self { data }
    }

    /// Build from row vectors (one per unit)
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        Ok(Self::new(from_rows(rows)?))
    }

    /// Consume and return the inner array
    pub fn into_inner(self) -> Array2<f64> {
        self.data
    }
}

impl GroupCounts for PopulationMatrix {
    fn counts(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }
}

/// Spatially smoothed population intensity, same shape as the
/// [`PopulationMatrix`] it was derived from.
///
/// Negative values (floating-point artifacts of weighting) are clamped to
/// zero on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalityMatrix {
    data: Array2<f64>,
}

impl LocalityMatrix {
    /// Wrap an existing array, clamping negatives to zero
    pub fn new(mut data: Array2<f64>) -> Self {
        clamp_non_negative(&mut data);
        Self { data }
    }

    /// Build from row vectors (one per unit)
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        Ok(Self::new(from_rows(rows)?))
    }

    /// Consume and return the inner array
    pub fn into_inner(self) -> Array2<f64> {
        self.data
    }
}

impl GroupCounts for LocalityMatrix {
    fn counts(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }
}
