//! Stereo reprojection: calibration loading and 3D to 2D point projection

pub mod calibration;
pub mod config;
pub mod error;
pub mod reprojection;

pub use calibration::{CameraId, ProjectionMatrix, StereoCalibration};
pub use config::ReprojectionConfig;
pub use error::{CalibrationError, ProjectionError, Result, RspError};
pub use reprojection::{Reprojector, ResidualStats};
