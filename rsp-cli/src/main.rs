use nalgebra::Point3;
use rsp_cli::{DEFAULT_TEST_POINT, report_failure, run_reprojection_check};
use rsp_core::{ReprojectionConfig, Reprojector};
use std::path::PathBuf;
use std::process;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "rsp-reproject",
    about = "Reproject a synthetic 3D point onto both cameras of a stereo calibration"
)]
struct Opt {
    /// Calibration file holding P1 and P2.
    ///
    /// Overrides the path from the config file.
    #[structopt(parse(from_os_str))]
    calibration: Option<PathBuf>,
    /// JSON reprojection config.
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,
    /// Test point X Y Z in meters.
    #[structopt(long, number_of_values = 3, allow_hyphen_values = true)]
    point: Option<Vec<f64>>,
}

fn run(opt: &Opt) -> rsp_core::Result<()> {
    let mut config = match &opt.config {
        Some(path) => ReprojectionConfig::from_file(path)?,
        None => ReprojectionConfig::default(),
    };
    if let Some(path) = &opt.calibration {
        config.calibration_path = path.clone();
    }

    let point = match opt.point.as_deref() {
        Some([x, y, z]) => Point3::new(*x, *y, *z),
        _ => Point3::from(DEFAULT_TEST_POINT),
    };

    let reprojector = Reprojector::new(&config)?;
    let stdout = std::io::stdout();
    run_reprojection_check(&reprojector, point, &mut stdout.lock())?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opt = Opt::from_args();
    if let Err(e) = run(&opt) {
        log::error!("Reprojection check failed");
        let status = report_failure(&e, &mut std::io::stderr().lock());
        process::exit(status);
    }
}
