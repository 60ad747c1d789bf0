//! Diagnostic check of the reprojection engine against a stored calibration

use nalgebra::{Point2, Point3};
use rsp_core::{CameraId, Reprojector, Result, RspError};
use std::io::Write;

/// Synthetic nose-tip point 60cm in front of the rig (meters)
pub const DEFAULT_TEST_POINT: [f64; 3] = [0.0, 0.0, 0.6];

const RULE: &str = "============================================================";

/// Pixel positions of the test point in each camera
#[derive(Debug, Clone, PartialEq)]
pub struct ReprojectionReport {
    pub point: Point3<f64>,
    pub cam1: Point2<f64>,
    pub cam2: Point2<f64>,
}

impl ReprojectionReport {
    pub fn pixel(&self, camera: CameraId) -> Point2<f64> {
        match camera {
            CameraId::Cam1 => self.cam1,
            CameraId::Cam2 => self.cam2,
        }
    }
}

/// Reproject one point to both cameras and write a readable summary
pub fn run_reprojection_check<W: Write>(
    reprojector: &Reprojector,
    point: Point3<f64>,
    out: &mut W,
) -> Result<ReprojectionReport> {
    let (cam1, cam2) = reprojector.project_both(&[point])?;
    let report = ReprojectionReport {
        point,
        cam1: cam1[0],
        cam2: cam2[0],
    };

    write_report(&report, out).map_err(|e| RspError::Io(e.to_string()))?;
    Ok(report)
}

/// Write the failure to `err_out` and return the process exit status
///
/// A missing calibration also gets a usage hint; its message already names the remedy.
pub fn report_failure<W: Write>(err: &RspError, err_out: &mut W) -> i32 {
    let written = if err.is_missing_calibration() {
        writeln!(err_out, "Error: {}", err).and_then(|_| {
            writeln!(
                err_out,
                "\nThen pass the generated file:\n  rsp-reproject path/to/stereo_calibration.json"
            )
        })
    } else {
        writeln!(err_out, "Error: {}", err)
    };
    if let Err(e) = written {
        log::warn!("Could not write error report: {}", e);
    }
    1
}

fn write_report<W: Write>(report: &ReprojectionReport, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Testing 2D Reprojection")?;
    writeln!(out, "{}", RULE)?;
    writeln!(
        out,
        "\nTest 3D point: ({:.2}, {:.2}, {:.2}) m",
        report.point.x, report.point.y, report.point.z
    )?;
    writeln!(out, "\nReprojected 2D coordinates:")?;
    for (label, camera) in [("Camera 1", CameraId::Cam1), ("Camera 2", CameraId::Cam2)] {
        let px = report.pixel(camera);
        writeln!(out, "  {}: ({:.1}, {:.1}) pixels", label, px.x, px.y)?;
    }
    writeln!(out, "\nReprojection test complete")?;
    writeln!(out, "{}", RULE)?;
    Ok(())
}
