//! Spatial units and the validated unit layer

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::matrix::{GroupCounts, PopulationMatrix};
use crate::error::{Error, Result};

/// One spatial observation (e.g. a census tract) reduced to its centroid.
///
/// Coordinates must be planar and projected: distances are Euclidean in
/// the layer's linear units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

impl Unit {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self { id: id.into(), x, y }
    }

    /// Squared Euclidean distance to another point
    #[inline]
    pub fn dist_sq(&self, other_x: f64, other_y: f64) -> f64 {
        let dx = self.x - other_x;
        let dy = self.y - other_y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another unit
    #[inline]
    pub fn dist(&self, other: &Unit) -> f64 {
        self.dist_sq(other.x, other.y).sqrt()
    }
}

/// Units plus their population counts, checked for consistent shape.
///
/// This is the immutable input of an analysis session. Output rows align
/// positionally with `units`.
#[derive(Debug, Clone)]
pub struct UnitLayer {
    units: Vec<Unit>,
    population: PopulationMatrix,
}

impl UnitLayer {
    /// Validate and bundle ids, coordinates and population.
    ///
    /// # Errors
    /// * [`Error::EmptyInput`] if there are zero rows
    /// * [`Error::DimensionMismatch`] if row counts differ
    /// * [`Error::NoGroupsSelected`] if `population` has zero columns
    /// * [`Error::NonFiniteValue`] if a coordinate or count is NaN or infinite
    pub fn new(
        ids: Vec<String>,
        coordinates: Vec<(f64, f64)>,
        population: Array2<f64>,
    ) -> Result<Self> {
        if ids.is_empty() && coordinates.is_empty() && population.nrows() == 0 {
            return Err(Error::EmptyInput);
        }
        if coordinates.len() != ids.len() {
            return Err(Error::DimensionMismatch {
                what: "coordinates",
                expected: ids.len(),
                actual: coordinates.len(),
            });
        }
        if population.nrows() != ids.len() {
            return Err(Error::DimensionMismatch {
                what: "population rows",
                expected: ids.len(),
                actual: population.nrows(),
            });
        }
        if ids.is_empty() {
            return Err(Error::EmptyInput);
        }
        if population.ncols() == 0 {
            return Err(Error::NoGroupsSelected);
        }
        for (unit, &(x, y)) in coordinates.iter().enumerate() {
            if !x.is_finite() {
                return Err(Error::NonFiniteValue { what: "x coordinate", unit });
            }
            if !y.is_finite() {
                return Err(Error::NonFiniteValue { what: "y coordinate", unit });
            }
        }
        for (unit, row) in population.rows().into_iter().enumerate() {
            if row.iter().any(|v| !v.is_finite()) {
                return Err(Error::NonFiniteValue { what: "group count", unit });
            }
        }

        let units = ids
            .into_iter()
            .zip(coordinates)
            .map(|(id, (x, y))| Unit { id, x, y })
            .collect();

        Ok(Self {
            units,
            population: PopulationMatrix::new(population),
        })
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn population(&self) -> &PopulationMatrix {
        &self.population
    }

    /// Number of units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn n_groups(&self) -> usize {
        self.population.n_groups()
    }

    /// Bounding box as (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.units.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(min_x, min_y, max_x, max_y), u| {
                (min_x.min(u.x), min_y.min(u.y), max_x.max(u.x), max_y.max(u.y))
            },
        )
    }

    /// Heuristic check for unprojected (longitude/latitude) coordinates.
    ///
    /// True when every coordinate lies within [-180, 180] × [-90, 90].
    /// A small projected layer near the origin also matches, so callers
    /// should warn rather than reject.
    pub fn looks_geographic(&self) -> bool {
        let (min_x, min_y, max_x, max_y) = self.bounds();
        min_x >= -180.0 && max_x <= 180.0 && min_y >= -90.0 && max_y <= 90.0
    }
}
