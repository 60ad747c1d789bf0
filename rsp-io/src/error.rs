use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("No images found in {} with extensions [{extensions}]", .dir.display())]
    NoImages { dir: PathBuf, extensions: String },

    #[error("Failed to load image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to save frame {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Frame dimensions mismatch: front={front:?}, side={side:?}")]
    DimensionMismatch {
        front: (usize, usize),
        side: (usize, usize),
    },

    #[error(
        "Mismatched image counts: {} has {left}, {} has {right}",
        .left_dir.display(),
        .right_dir.display()
    )]
    CountMismatch {
        left_dir: PathBuf,
        left: usize,
        right_dir: PathBuf,
        right: usize,
    },

    #[error("Invalid resize: {0}")]
    InvalidResize(String),

    #[error("Invalid frame shape: {0}")]
    InvalidShape(String),

    #[error("Frame shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
