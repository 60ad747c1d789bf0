//! Reprojection of triangulated 3D points onto stereo image planes

mod engine;
mod residual;

pub use engine::Reprojector;
pub use residual::ResidualStats;
