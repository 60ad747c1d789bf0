use std::path::PathBuf;
use thiserror::Error;

/// Common errors across the reprojection pipeline
#[derive(Error, Debug)]
pub enum RspError {
    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),

    #[error("Projection error: {0}")]
    Projection(#[from] ProjectionError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(String),
}

#[derive(Error, Debug)]
pub enum CalibrationError {
    #[error(
        "Calibration file not found: {}\nRun stereo calibration first to generate calibration data.",
        .path.display()
    )]
    NotFound { path: PathBuf },

    #[error("Malformed calibration file {}: {reason}", .path.display())]
    Format { path: PathBuf, reason: String },

    #[error("Failed to access calibration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize calibration: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ProjectionError {
    #[error("Degenerate projection for point {index}: homogeneous divisor is zero")]
    Degenerate { index: usize },

    #[error("Projection matrix contains non-finite values")]
    NonFiniteMatrix,
}

impl RspError {
    /// True if the error comes from a calibration artifact that does not exist
    pub fn is_missing_calibration(&self) -> bool {
        matches!(self, RspError::Calibration(CalibrationError::NotFound { .. }))
    }
}

pub type Result<T> = std::result::Result<T, RspError>;
