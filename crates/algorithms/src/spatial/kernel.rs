//! Distance-weighting kernels
//!
//! Turn distances into weights for a given bandwidth:
//!
//! ```text
//! Gaussian:      w = exp(-0.5 * (d/b)^2)
//! BiSquare:      w = (1 - (d/b)^2)^2   for d <= b, else 0
//! MovingWindow:  w = 1                 for d <= b, else 0
//! ```
//!
//! All three give weight 1 at zero distance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use segreg_core::{Error, Result};

/// Kernel shape used to weight neighbouring units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KernelKind {
    /// Smooth decay, no cutoff
    #[default]
    Gaussian,
    /// Smooth decay to zero at the bandwidth
    BiSquare,
    /// Binary neighbourhood of radius `bandwidth`
    MovingWindow,
}

impl KernelKind {
    pub const ALL: [KernelKind; 3] = [
        KernelKind::Gaussian,
        KernelKind::BiSquare,
        KernelKind::MovingWindow,
    ];

    /// Weight for a single distance. `bandwidth` must already be validated.
    #[inline]
    pub fn weight(self, distance: f64, bandwidth: f64) -> f64 {
        let u = distance / bandwidth;
        match self {
            KernelKind::Gaussian => (-0.5 * u * u).exp(),
            KernelKind::BiSquare => {
                if distance <= bandwidth {
                    let t = 1.0 - u * u;
                    t * t
                } else {
                    0.0
                }
            }
            KernelKind::MovingWindow => {
                if distance <= bandwidth {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Whether weights are exactly zero beyond the bandwidth
    pub fn is_compact(self) -> bool {
        !matches!(self, KernelKind::Gaussian)
    }

    /// Weights for a row of distances. `bandwidth` must already be validated.
    pub fn weights(self, distances: &[f64], bandwidth: f64) -> Vec<f64> {
        distances.iter().map(|&d| self.weight(d, bandwidth)).collect()
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KernelKind::Gaussian => "gaussian",
            KernelKind::BiSquare => "bisquare",
            KernelKind::MovingWindow => "moving-window",
        };
        f.write_str(name)
    }
}

impl FromStr for KernelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gaussian" | "gauss" => Ok(KernelKind::Gaussian),
            "bisquare" | "bi-square" | "biweight" => Ok(KernelKind::BiSquare),
            "moving-window" | "moving_window" | "movingwindow" | "window" | "box" => {
                Ok(KernelKind::MovingWindow)
            }
            _ => Err(Error::InvalidKernel(s.to_string())),
        }
    }
}

/// Reject non-positive or non-finite bandwidths.
pub fn validate_bandwidth(bandwidth: f64) -> Result<()> {
    if bandwidth.is_finite() && bandwidth > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidBandwidth(bandwidth))
    }
}

/// Weight every distance with the given kernel.
///
/// # Errors
/// [`Error::InvalidBandwidth`] when `bandwidth <= 0` (or NaN/infinite).
pub fn kernel_weights(distances: &[f64], bandwidth: f64, kind: KernelKind) -> Result<Vec<f64>> {
    validate_bandwidth(bandwidth)?;
    Ok(kind.weights(distances, bandwidth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_distance_is_max() {
        for kind in KernelKind::ALL {
            assert_eq!(kind.weight(0.0, 2.5), 1.0, "{kind}");
        }
    }

    #[test]
    fn test_gaussian_values() {
        let w = kernel_weights(&[0.0, 1.0, 2.0, 100.0], 1.0, KernelKind::Gaussian).unwrap();
        assert_relative_eq!(w[1], (-0.5_f64).exp(), epsilon = 1e-15);
        assert_relative_eq!(w[2], (-2.0_f64).exp(), epsilon = 1e-15);
        assert!(w[3] >= 0.0 && w[3] < 1e-300);
    }

    #[test]
    fn test_bisquare_support() {
        let w = kernel_weights(&[0.0, 1.0, 2.0, 2.0001, 50.0], 2.0, KernelKind::BiSquare).unwrap();
        assert_eq!(w[0], 1.0);
        assert_relative_eq!(w[1], 0.5625, epsilon = 1e-15);
        assert_eq!(w[2], 0.0);
        assert_eq!(w[3], 0.0);
        assert_eq!(w[4], 0.0);
    }

    #[test]
    fn test_moving_window_support() {
        let w = kernel_weights(&[0.0, 2.0, 2.0001], 2.0, KernelKind::MovingWindow).unwrap();
        assert_eq!(w, vec![1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_invalid_bandwidth() {
        for bw in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = kernel_weights(&[1.0], bw, KernelKind::Gaussian).unwrap_err();
            assert!(matches!(err, Error::InvalidBandwidth(_)));
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Gaussian".parse::<KernelKind>().unwrap(), KernelKind::Gaussian);
        assert_eq!("bi-square".parse::<KernelKind>().unwrap(), KernelKind::BiSquare);
        assert_eq!("window".parse::<KernelKind>().unwrap(), KernelKind::MovingWindow);
        for kind in KernelKind::ALL {
            assert_eq!(kind.to_string().parse::<KernelKind>().unwrap(), kind);
        }
        assert!(matches!(
            "tricube".parse::<KernelKind>(),
            Err(Error::InvalidKernel(_))
        ));
    }

    #[test]
    fn test_compactness() {
        assert!(!KernelKind::Gaussian.is_compact());
        assert!(KernelKind::BiSquare.is_compact());
        assert!(KernelKind::MovingWindow.is_compact());
    }
}
