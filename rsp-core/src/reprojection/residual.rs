use nalgebra::Point2;

use crate::error::{Result, RspError};

/// Pixel distances between observed points and their reprojections
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualStats {
    pub residuals: Vec<f64>,
    pub mean: f64,
    pub rms: f64,
    pub max: f64,
}

impl ResidualStats {
    /// Compare observed pixels with reprojected pixels, matched by index
    pub fn compute(observed: &[Point2<f64>], reprojected: &[Point2<f64>]) -> Result<Self> {
        if observed.len() != reprojected.len() {
            return Err(RspError::InvalidArgument(format!(
                "observed has {} points but reprojected has {}",
                observed.len(),
                reprojected.len()
            )));
        }

        let residuals: Vec<f64> = observed
            .iter()
            .zip(reprojected)
            .map(|(o, r)| (o - r).norm())
            .collect();

        if residuals.is_empty() {
            return Ok(Self {
                residuals,
                mean: 0.0,
                rms: 0.0,
                max: 0.0,
            });
        }

        let n = residuals.len() as f64;
        let mean = residuals.iter().sum::<f64>() / n;
        let rms = (residuals.iter().map(|r| r * r).sum::<f64>() / n).sqrt();
        let max = residuals.iter().copied().fold(0.0, f64::max);

        Ok(Self {
            residuals,
            mean,
            rms,
            max,
        })
    }

    pub fn len(&self) -> usize {
        self.residuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residuals.is_empty()
    }
}
