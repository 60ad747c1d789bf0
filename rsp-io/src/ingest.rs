
use image::imageops::FilterType;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};
use crate::frame::{ColorMode, Frame};

/// Extensions accepted when listing a frame directory
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Largest frame a resize may produce, in pixels
pub const MAX_FRAME_PIXELS: u64 = 1 << 28;

/// Target of a resize
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resize {
    /// Exact output size in pixels
    To { width: u32, height: u32 },
    /// Multiply both dimensions, e.g. 0.5 for half size
    Scale(f64),
}

/// Load a single image in the requested channel layout
pub fn load_image<P: AsRef<Path>>(path: P, mode: ColorMode) -> Result<Frame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }

    let image = image::open(path).map_err(|source| IngestError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    Frame::from_dynamic(&image, mode)
}

/// Load a synchronized front/side frame pair of identical size
pub fn load_frame_pair<P: AsRef<Path>, Q: AsRef<Path>>(
    front_path: P,
    side_path: Q,
    mode: ColorMode,
) -> Result<(Frame, Frame)> {
    let front = load_image(front_path, mode)?;
    let side = load_image(side_path, mode)?;

    if front.size() != side.size() {
        return Err(IngestError::DimensionMismatch {
            front: front.size(),
            side: side.size(),
        });
    }

    Ok((front, side))
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// List image files in a directory, sorted by path
///
/// Extensions are matched case-insensitively, with or without a leading dot.
pub fn load_images_from_directory<P: AsRef<Path>>(
    dir: P,
    extensions: &[&str],
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(IngestError::NotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(IngestError::NotADirectory(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extensions) {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Err(IngestError::NoImages {
            dir: dir.to_path_buf(),
            extensions: extensions.join(", "),
        });
    }

    paths.sort();
    info!("Found {} images in {}", paths.len(), dir.display());

    Ok(paths)
}

/// Check that two directories hold the same number of frames
pub fn validate_frame_pair_directories<P: AsRef<Path>, Q: AsRef<Path>>(
    dir1: P,
    dir2: Q,
) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let (dir1, dir2) = (dir1.as_ref(), dir2.as_ref());
    let images1 = load_images_from_directory(dir1, DEFAULT_IMAGE_EXTENSIONS)?;
    let images2 = load_images_from_directory(dir2, DEFAULT_IMAGE_EXTENSIONS)?;

    if images1.len() != images2.len() {
        return Err(IngestError::CountMismatch {
            left_dir: dir1.to_path_buf(),
            left: images1.len(),
            right_dir: dir2.to_path_buf(),
            right: images2.len(),
        });
    }

    info!("Validated {} frame pairs", images1.len());
    Ok((images1, images2))
}

/// Write a frame to disk; the format follows the file extension
pub fn save_frame<P: AsRef<Path>>(frame: &Frame, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    frame
        .to_dynamic()?
        .save(path)
        .map_err(|source| IngestError::Encode {
            path: path.to_path_buf(),
            source,
        })?;

    info!("Saved frame to {}", path.display());
    Ok(())
}

/// Read (width, height) from the image header
pub fn frame_dimensions<P: AsRef<Path>>(path: P) -> Result<(u32, u32)> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }

    image::image_dimensions(path).map_err(|source| IngestError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Resize with bilinear filtering, keeping the color mode
///
/// The target must be non-empty and at most `MAX_FRAME_PIXELS` pixels.
pub fn resize_frame(frame: &Frame, resize: Resize) -> Result<Frame> {
    let (width, height) = match resize {
        Resize::To { width, height } => (width as f64, height as f64),
        Resize::Scale(factor) => {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(IngestError::InvalidResize(format!(
                    "scale factor must be positive, got {}",
                    factor
                )));
            }
            (
                (frame.width() as f64 * factor).floor(),
                (frame.height() as f64 * factor).floor(),
            )
        }
    };

    if width < 1.0 || height < 1.0 {
        return Err(IngestError::InvalidResize(format!(
            "target size {}x{} is empty",
            width, height
        )));
    }
    if width * height > MAX_FRAME_PIXELS as f64 {
        return Err(IngestError::InvalidResize(format!(
            "target size {}x{} exceeds {} pixels",
            width, height, MAX_FRAME_PIXELS
        )));
    }

    let resized = frame
        .to_dynamic()?
        .resize_exact(width as u32, height as u32, FilterType::Triangle);
    Frame::from_dynamic(&resized, frame.mode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 7]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_load_image_missing() {
        let dir = TempDir::new().unwrap();
        let err = load_image(dir.path().join("nope.png"), ColorMode::Rgb).unwrap_err();
        assert!(matches!(err, IngestError::NotFound(_)));
    }

    #[test]
    fn test_load_image_undecodable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"not a png").unwrap();
        assert!(matches!(
            load_image(&path, ColorMode::Rgb),
            Err(IngestError::Decode { .. })
        ));
    }

    #[test]
    fn test_load_image_modes() {
        let dir = TempDir::new().unwrap();
        let path = write_png(dir.path(), "frame.png", 6, 4);

        let rgb = load_image(&path, ColorMode::Rgb).unwrap();
        assert_eq!(rgb.data().dim(), (4, 6, 3));
        assert_eq!(rgb.data()[[3, 5, 0]], 5);
        assert_eq!(rgb.data()[[3, 5, 2]], 7);

        let bgr = load_image(&path, ColorMode::Bgr).unwrap();
        assert_eq!(bgr.data()[[3, 5, 0]], 7);
        assert_eq!(bgr.data()[[3, 5, 2]], 5);

        let gray = load_image(&path, ColorMode::Gray).unwrap();
        assert_eq!(gray.data().dim(), (4, 6, 1));
    }

    #[test]
    fn test_load_frame_pair() {
        let dir = TempDir::new().unwrap();
        let front = write_png(dir.path(), "front.png", 8, 6);
        let side = write_png(dir.path(), "side.png", 8, 6);
        let wide = write_png(dir.path(), "wide.png", 10, 6);

        let (f, s) = load_frame_pair(&front, &side, ColorMode::Rgb).unwrap();
        assert_eq!(f.size(), s.size());

        let err = load_frame_pair(&front, &wide, ColorMode::Rgb).unwrap_err();
        assert!(matches!(
            err,
            IngestError::DimensionMismatch {
                front: (8, 6),
                side: (10, 6)
            }
        ));
    }

    #[test]
    fn test_directory_listing_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        write_png(dir.path(), "cam_frame_0002.png", 2, 2);
        write_png(dir.path(), "cam_frame_0000.png", 2, 2);
        fs::copy(
            dir.path().join("cam_frame_0000.png"),
            dir.path().join("cam_frame_0001.PNG"),
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "skip me").unwrap();
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let paths = load_images_from_directory(dir.path(), DEFAULT_IMAGE_EXTENSIONS).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["cam_frame_0000.png", "cam_frame_0001.PNG", "cam_frame_0002.png"]
        );

        let dotted = load_images_from_directory(dir.path(), &[".png"]).unwrap();
        assert_eq!(dotted.len(), 3);
    }

    #[test]
    fn test_directory_errors() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_images_from_directory(dir.path().join("missing"), DEFAULT_IMAGE_EXTENSIONS),
            Err(IngestError::NotFound(_))
        ));

        let file = write_png(dir.path(), "single.png", 2, 2);
        assert!(matches!(
            load_images_from_directory(&file, DEFAULT_IMAGE_EXTENSIONS),
            Err(IngestError::NotADirectory(_))
        ));

        assert!(matches!(
            load_images_from_directory(dir.path(), &["tif"]),
            Err(IngestError::NoImages { .. })
        ));
    }

    #[test]
    fn test_validate_frame_pair_directories() {
        let root = TempDir::new().unwrap();
        let cam1 = root.path().join("cam1");
        let cam2 = root.path().join("cam2");
        fs::create_dir_all(&cam1).unwrap();
        fs::create_dir_all(&cam2).unwrap();

        for i in 0..3 {
            write_png(&cam1, &format!("cam1_frame_{:04}.png", i), 2, 2);
            write_png(&cam2, &format!("cam2_frame_{:04}.png", i), 2, 2);
        }
        let (a, b) = validate_frame_pair_directories(&cam1, &cam2).unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(b.len(), 3);

        write_png(&cam2, "cam2_frame_0003.png", 2, 2);
        assert!(matches!(
            validate_frame_pair_directories(&cam1, &cam2),
            Err(IngestError::CountMismatch { left: 3, right: 4, .. })
        ));
    }

    #[test]
    fn test_save_frame_round_trip() {
        let dir = TempDir::new().unwrap();
        let src = write_png(dir.path(), "src.png", 5, 3);

        for mode in [ColorMode::Rgb, ColorMode::Bgr, ColorMode::Gray] {
            let frame = load_image(&src, mode).unwrap();
            let out = dir.path().join("out").join(format!("{:?}.png", mode));
            save_frame(&frame, &out).unwrap();
            assert_eq!(load_image(&out, mode).unwrap(), frame);
        }
    }

    #[test]
    fn test_frame_dimensions() {
        let dir = TempDir::new().unwrap();
        let path = write_png(dir.path(), "dims.png", 12, 7);
        assert_eq!(frame_dimensions(&path).unwrap(), (12, 7));
        assert!(matches!(
            frame_dimensions(dir.path().join("none.png")),
            Err(IngestError::NotFound(_))
        ));
    }

    #[test]
    fn test_resize_frame() {
        let dir = TempDir::new().unwrap();
        let frame = load_image(write_png(dir.path(), "big.png", 20, 10), ColorMode::Bgr).unwrap();

        let half = resize_frame(&frame, Resize::Scale(0.5)).unwrap();
        assert_eq!(half.size(), (10, 5));
        assert_eq!(half.mode(), ColorMode::Bgr);

        let fixed = resize_frame(&frame, Resize::To { width: 7, height: 3 }).unwrap();
        assert_eq!(fixed.size(), (7, 3));
    }

    #[test]
    fn test_resize_frame_invalid() {
        let frame = Frame::new(ndarray::Array3::zeros((4, 4, 3)), ColorMode::Rgb).unwrap();
        for resize in [
            Resize::Scale(0.0),
            Resize::Scale(-1.0),
            Resize::Scale(f64::NAN),
            Resize::Scale(0.1),
            Resize::To { width: 0, height: 4 },
            Resize::Scale(1e12),
            Resize::To {
                width: u32::MAX,
                height: u32::MAX,
            },
            Resize::To {
                width: 1 << 15,
                height: 1 << 14,
            },
        ] {
            assert!(
                matches!(resize_frame(&frame, resize), Err(IngestError::InvalidResize(_))),
                "{:?}",
                resize
            );
        }
    }
}
