//! Measure identifiers and result values

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use segreg_core::{Error, Result};

/// Segregation measure families.
///
/// Variant order is the column order of the assembled result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeasureKind {
    /// Exposure / isolation (P*)
    Exposure,
    /// Dissimilarity (D)
    Dissimilarity,
    /// Entropy (diversity)
    Entropy,
    /// Entropy index H (Theil)
    IndexH,
}

impl MeasureKind {
    pub const ALL: [MeasureKind; 4] = [
        MeasureKind::Exposure,
        MeasureKind::Dissimilarity,
        MeasureKind::Entropy,
        MeasureKind::IndexH,
    ];
}

impl fmt::Display for MeasureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MeasureKind::Exposure => "exposure",
            MeasureKind::Dissimilarity => "dissimilarity",
            MeasureKind::Entropy => "entropy",
            MeasureKind::IndexH => "index-h",
        };
        f.write_str(name)
    }
}

impl FromStr for MeasureKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "exposure" | "isolation" | "exp" | "iso" => Ok(MeasureKind::Exposure),
            "dissimilarity" | "dissimil" | "d" => Ok(MeasureKind::Dissimilarity),
            "entropy" | "diversity" => Ok(MeasureKind::Entropy),
            "index-h" | "index_h" | "indexh" | "h" | "theil" => Ok(MeasureKind::IndexH),
            _ => Err(Error::Other(format!(
                "Unknown measure: {}. Use dissimilarity, exposure, entropy, or index-h.",
                s
            ))),
        }
    }
}

/// Per-unit or region-wide evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    Local,
    Global,
}

/// Per-unit values of a measure
#[derive(Debug, Clone, PartialEq)]
pub enum LocalValues {
    /// One value per unit
    Vector(Array1<f64>),
    /// `n_units × n_groups²` (exposure)
    Matrix(Array2<f64>),
}

/// Region-wide value of a measure
#[derive(Debug, Clone, PartialEq)]
pub enum GlobalValue {
    Scalar(f64),
    /// `n_groups × n_groups` (exposure)
    Matrix(Array2<f64>),
}

/// Result of one measure computation
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureResult {
    Local(LocalValues),
    Global(GlobalValue),
}

impl MeasureResult {
    /// Per-unit vector, if this is a local vector result
    pub fn as_local_vector(&self) -> Option<&Array1<f64>> {
        match self {
            MeasureResult::Local(LocalValues::Vector(v)) => Some(v),
            _ => None,
        }
    }

    /// Per-unit matrix, if this is a local matrix result
    pub fn as_local_matrix(&self) -> Option<&Array2<f64>> {
        match self {
            MeasureResult::Local(LocalValues::Matrix(m)) => Some(m),
            _ => None,
        }
    }

    /// Scalar, if this is a global scalar result
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            MeasureResult::Global(GlobalValue::Scalar(v)) => Some(*v),
            _ => None,
        }
    }

    /// Group-by-group matrix, if this is a global matrix result
    pub fn as_global_matrix(&self) -> Option<&Array2<f64>> {
        match self {
            MeasureResult::Global(GlobalValue::Matrix(m)) => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_column_order() {
        let mut kinds = vec![
            MeasureKind::IndexH,
            MeasureKind::Dissimilarity,
            MeasureKind::Entropy,
            MeasureKind::Exposure,
        ];
        kinds.sort();
        assert_eq!(kinds, MeasureKind::ALL.to_vec());
    }

    #[test]
    fn test_parse_names() {
        for kind in MeasureKind::ALL {
            assert_eq!(kind.to_string().parse::<MeasureKind>().unwrap(), kind);
        }
        assert_eq!("Isolation".parse::<MeasureKind>().unwrap(), MeasureKind::Exposure);
        assert_eq!("theil".parse::<MeasureKind>().unwrap(), MeasureKind::IndexH);
        assert!("gini".parse::<MeasureKind>().is_err());
    }

    #[test]
    fn test_accessors() {
        let r = MeasureResult::Global(GlobalValue::Scalar(0.5));
        assert_eq!(r.as_scalar(), Some(0.5));
        assert!(r.as_local_vector().is_none());

        let r = MeasureResult::Local(LocalValues::Matrix(array![[1.0]]));
        assert_eq!(r.as_local_matrix(), Some(&array![[1.0]]));
        assert!(r.as_global_matrix().is_none());
    }
}
