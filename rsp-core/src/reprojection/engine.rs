use log::{debug, info};
use nalgebra::{Point2, Point3};
use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;
use std::path::Path;

use super::residual::ResidualStats;
use crate::calibration::{CameraId, StereoCalibration};
use crate::config::{DEFAULT_PARALLEL_THRESHOLD, ReprojectionConfig};
use crate::error::{ProjectionError, Result, RspError};

/// Projects triangulated 3D points back onto each camera of a stereo rig
#[derive(Debug, Clone)]
pub struct Reprojector {
    calibration: StereoCalibration,
    parallel_threshold: usize,
}

impl Reprojector {
    /// Load calibration from the configured path
    pub fn new(config: &ReprojectionConfig) -> Result<Self> {
        let calibration = StereoCalibration::load(&config.calibration_path)?;
        Ok(Self {
            calibration,
            parallel_threshold: config.parallel_threshold,
        })
    }

    /// Load calibration from an explicit path with default settings
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(&ReprojectionConfig::with_calibration_path(path.as_ref()))
    }

    /// Use an already loaded calibration
    pub fn from_calibration(calibration: StereoCalibration) -> Self {
        Self {
            calibration,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn calibration(&self) -> &StereoCalibration {
        &self.calibration
    }

    /// Project 3D points to 2D pixel coordinates of one camera
    ///
    /// Output index `i` corresponds to input index `i`. Fails without partial
    /// output if any point has a zero homogeneous divisor.
    pub fn project(&self, points: &[Point3<f64>], camera: CameraId) -> Result<Vec<Point2<f64>>> {
        let matrix = self.calibration.matrix(camera);
        let project_one = |(index, point): (usize, &Point3<f64>)| {
            matrix
                .project(point)
                .ok_or(ProjectionError::Degenerate { index })
        };

        let projected: std::result::Result<Vec<_>, _> =
            if points.len() >= self.parallel_threshold {
                points.par_iter().enumerate().map(project_one).collect()
            } else {
                points.iter().enumerate().map(project_one).collect()
            };
        let projected = projected?;

        debug!("Projected {} points to {}", points.len(), camera);
        Ok(projected)
    }

    /// Project with a camera given by name ("cam1" or "cam2")
    pub fn project_named(&self, points: &[Point3<f64>], camera: &str) -> Result<Vec<Point2<f64>>> {
        let camera: CameraId = camera.parse()?;
        self.project(points, camera)
    }

    /// Project the same points into both cameras
    pub fn project_both(
        &self,
        points: &[Point3<f64>],
    ) -> Result<(Vec<Point2<f64>>, Vec<Point2<f64>>)> {
        let cam1 = self.project(points, CameraId::Cam1)?;
        let cam2 = self.project(points, CameraId::Cam2)?;

        info!("Reprojected {} points to both cameras", points.len());
        Ok((cam1, cam2))
    }

    /// Project an Nx3 array of points into an Nx2 array of pixels
    pub fn project_array(&self, points: ArrayView2<f64>, camera: CameraId) -> Result<Array2<f64>> {
        if points.ncols() != 3 {
            return Err(RspError::InvalidArgument(format!(
                "expected an Nx3 point array, got {}x{}",
                points.nrows(),
                points.ncols()
            )));
        }

        let batch: Vec<Point3<f64>> = points
            .rows()
            .into_iter()
            .map(|row| Point3::new(row[0], row[1], row[2]))
            .collect();
        let projected = self.project(&batch, camera)?;

        Ok(Array2::from_shape_fn((projected.len(), 2), |(i, j)| {
            if j == 0 { projected[i].x } else { projected[i].y }
        }))
    }

    pub fn project_array_both(
        &self,
        points: ArrayView2<f64>,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        let cam1 = self.project_array(points, CameraId::Cam1)?;
        let cam2 = self.project_array(points, CameraId::Cam2)?;
        Ok((cam1, cam2))
    }

    /// Reproject points and compare them with observed pixel positions
    pub fn residuals(
        &self,
        points: &[Point3<f64>],
        observed: &[Point2<f64>],
        camera: CameraId,
    ) -> Result<ResidualStats> {
        let reprojected = self.project(points, camera)?;
        ResidualStats::compute(observed, &reprojected)
    }
}
