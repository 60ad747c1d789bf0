//! Reprojection configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, RspError};

/// Default location of the stereo calibration artifact
pub const DEFAULT_CALIBRATION_PATH: &str = "data/calibration/stereo_calibration.json";

/// Batch size at which projection switches to rayon
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Settings passed explicitly to the reprojection engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReprojectionConfig {
    /// Path to the calibration artifact holding P1 and P2.
    pub calibration_path: PathBuf,
    /// Minimum batch length projected in parallel.
    pub parallel_threshold: usize,
}

impl Default for ReprojectionConfig {
    fn default() -> Self {
        Self {
            calibration_path: PathBuf::from(DEFAULT_CALIBRATION_PATH),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ReprojectionConfig {
    /// Default settings with a different calibration path
    pub fn with_calibration_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            calibration_path: path.into(),
            ..Default::default()
        }
    }

    /// Read settings from a JSON file; missing fields keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| RspError::Io(format!("{}: {}", path.display(), e)))?;

        serde_json::from_str(&contents).map_err(|e| {
            RspError::InvalidArgument(format!("invalid config {}: {}", path.display(), e))
        })
    }
}
