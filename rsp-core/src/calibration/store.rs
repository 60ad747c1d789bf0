use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::{ProjectionMatrix, StereoCalibration, matrix_from_rows};
use crate::error::{CalibrationError, Result};

/// On-disk layout; keys other than P1/P2 are ignored
#[derive(Debug, Default, Serialize, Deserialize)]
struct CalibrationFile {
    #[serde(rename = "P1", default, skip_serializing_if = "Option::is_none")]
    p1: Option<Vec<Vec<f64>>>,
    #[serde(rename = "P2", default, skip_serializing_if = "Option::is_none")]
    p2: Option<Vec<Vec<f64>>>,
}

fn format_error(path: &Path, reason: impl Into<String>) -> CalibrationError {
    CalibrationError::Format {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn required_matrix(
    path: &Path,
    key: &str,
    rows: Option<Vec<Vec<f64>>>,
) -> std::result::Result<ProjectionMatrix, CalibrationError> {
    let rows = rows.ok_or_else(|| format_error(path, format!("missing matrix {}", key)))?;
    let matrix =
        matrix_from_rows(&rows).map_err(|e| format_error(path, format!("{}: {}", key, e)))?;
    ProjectionMatrix::new(matrix)
        .map_err(|_| format_error(path, format!("{}: non-finite value", key)))
}

impl StereoCalibration {
    /// Load P1/P2 from a JSON calibration artifact
    ///
    /// Only JSON is read. NumPy `.npz` archives are rejected with a format
    /// error; convert them to `{"P1": [[..]; 3], "P2": [[..]; 3]}` first.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CalibrationError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let is_npz = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("npz"));
        if is_npz {
            return Err(format_error(
                path,
                "NumPy .npz archives are not supported; export P1 and P2 as JSON",
            )
            .into());
        }

        let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::InvalidData => format_error(path, "file is not valid UTF-8"),
            _ => CalibrationError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let file: CalibrationFile =
            serde_json::from_str(&contents).map_err(|e| format_error(path, e.to_string()))?;

        let p1 = required_matrix(path, "P1", file.p1)?;
        let p2 = required_matrix(path, "P2", file.p2)?;

        info!("Loaded calibration for reprojection from {}", path.display());
        Ok(Self { p1, p2 })
    }

    /// Write P1/P2 as pretty JSON, creating parent directories as needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let io_err = |source: std::io::Error| CalibrationError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let file = CalibrationFile {
            p1: Some(self.p1.to_rows()),
            p2: Some(self.p2.to_rows()),
        };
        let json = serde_json::to_string_pretty(&file).map_err(CalibrationError::from)?;
        fs::write(path, json).map_err(io_err)?;

        info!("Saved calibration to {}", path.display());
        Ok(())
    }
}
