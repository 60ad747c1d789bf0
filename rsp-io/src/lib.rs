
//! Frame ingestion for the stereo pipeline

pub mod error;
pub mod frame;
pub mod ingest;

pub use error::{IngestError, Result};
pub use frame::{ColorMode, Frame};
pub use ingest::{
    DEFAULT_IMAGE_EXTENSIONS, MAX_FRAME_PIXELS, Resize, frame_dimensions, load_frame_pair,
    load_image, load_images_from_directory, resize_frame, save_frame,
    validate_frame_pair_directories,
};
