//! Stereo calibration artifacts and projection matrices

mod store;

use nalgebra::{Matrix3, Matrix3x4, Point2, Point3, Vector3};
use std::fmt;
use std::str::FromStr;

use crate::error::{ProjectionError, Result, RspError};

/// Camera selector for a stereo pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraId {
    Cam1,
    Cam2,
}

impl CameraId {
    pub const ALL: [CameraId; 2] = [CameraId::Cam1, CameraId::Cam2];

    pub fn as_str(&self) -> &'static str {
        match self {
            CameraId::Cam1 => "cam1",
            CameraId::Cam2 => "cam2",
        }
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CameraId {
    type Err = RspError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cam1" => Ok(CameraId::Cam1),
            "cam2" => Ok(CameraId::Cam2),
            other => Err(RspError::InvalidArgument(format!(
                "camera must be 'cam1' or 'cam2', got '{}'",
                other
            ))),
        }
    }
}

/// 3x4 matrix mapping homogeneous 3D points to homogeneous image coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionMatrix {
    matrix: Matrix3x4<f64>,
}

impl ProjectionMatrix {
    /// Wrap a matrix, rejecting NaN or infinite entries
    pub fn new(matrix: Matrix3x4<f64>) -> Result<Self> {
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(ProjectionError::NonFiniteMatrix.into());
        }
        Ok(Self { matrix })
    }

    /// Build from row-major nested values; exactly 3 rows of 4 values
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let matrix = matrix_from_rows(rows).map_err(RspError::InvalidArgument)?;
        Self::new(matrix)
    }

    /// Compose `P = K [R | t]`
    pub fn from_parts(k: &Matrix3<f64>, r: &Matrix3<f64>, t: &Vector3<f64>) -> Result<Self> {
        let mut rt = Matrix3x4::<f64>::zeros();
        rt.fixed_view_mut::<3, 3>(0, 0).copy_from(r);
        rt.set_column(3, t);
        Self::new(k * rt)
    }

    pub fn as_matrix(&self) -> &Matrix3x4<f64> {
        &self.matrix
    }

    /// Row-major nested copy of the matrix values
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..3)
            .map(|r| (0..4).map(|c| self.matrix[(r, c)]).collect())
            .collect()
    }

    /// Project a 3D point to pixel coordinates
    /// Returns None if the homogeneous divisor is zero or the result is not finite
    pub fn project(&self, point: &Point3<f64>) -> Option<Point2<f64>> {
        let h = self.matrix * point.to_homogeneous();
        let w = h.z;
        if w == 0.0 {
            return None;
        }

        let x = h.x / w;
        let y = h.y / w;
        if !x.is_finite() || !y.is_finite() {
            return None;
        }

        Some(Point2::new(x, y))
    }
}

/// Shape check shared by the constructor and the calibration store
pub(crate) fn matrix_from_rows(rows: &[Vec<f64>]) -> std::result::Result<Matrix3x4<f64>, String> {
    if rows.len() != 3 {
        return Err(format!("expected 3 rows, found {}", rows.len()));
    }
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != 4) {
        return Err(format!("row {} has {} columns, expected 4", i, row.len()));
    }
    Ok(Matrix3x4::from_fn(|r, c| rows[r][c]))
}

/// Projection matrices for both cameras of a stereo rig
#[derive(Debug, Clone, PartialEq)]
pub struct StereoCalibration {
    p1: ProjectionMatrix,
    p2: ProjectionMatrix,
}

impl StereoCalibration {
    pub fn new(p1: ProjectionMatrix, p2: ProjectionMatrix) -> Self {
        Self { p1, p2 }
    }

    pub fn p1(&self) -> &ProjectionMatrix {
        &self.p1
    }

    pub fn p2(&self) -> &ProjectionMatrix {
        &self.p2
    }

    /// Get the projection matrix for a camera
    pub fn matrix(&self, camera: CameraId) -> &ProjectionMatrix {
        match camera {
            CameraId::Cam1 => &self.p1,
            CameraId::Cam2 => &self.p2,
        }
    }
}
