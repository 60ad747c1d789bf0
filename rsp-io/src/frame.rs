
use image::{DynamicImage, GrayImage, RgbImage};
use ndarray::{Array3, Axis};

use crate::error::{IngestError, Result};

/// Channel layout of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Rgb,
    Bgr,
    Gray,
}

impl ColorMode {
    /// Number of channels per pixel
    pub fn channels(&self) -> usize {
        match self {
            ColorMode::Rgb | ColorMode::Bgr => 3,
            ColorMode::Gray => 1,
        }
    }
}

/// Raw frame pixels (shape: [height, width, channels])
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    data: Array3<u8>,
    mode: ColorMode,
}

impl Frame {
    /// Wrap pixel data, checking the channel count against the color mode
    pub fn new(data: Array3<u8>, mode: ColorMode) -> Result<Self> {
        let channels = data.dim().2;
        if channels != mode.channels() {
            return Err(IngestError::InvalidShape(format!(
                "{:?} frame needs {} channels, got {}",
                mode,
                mode.channels(),
                channels
            )));
        }
        Ok(Self { data, mode })
    }

    /// Convert a decoded image into the requested channel layout
    pub fn from_dynamic(image: &DynamicImage, mode: ColorMode) -> Result<Self> {
        let (width, height) = (image.width() as usize, image.height() as usize);

        let data = match mode {
            ColorMode::Gray => {
                Array3::from_shape_vec((height, width, 1), image.to_luma8().into_raw())?
            }
            ColorMode::Rgb => {
                Array3::from_shape_vec((height, width, 3), image.to_rgb8().into_raw())?
            }
            ColorMode::Bgr => {
                let mut rgb =
                    Array3::from_shape_vec((height, width, 3), image.to_rgb8().into_raw())?;
                rgb.invert_axis(Axis(2));
                rgb.as_standard_layout().into_owned()
            }
        };

        Ok(Self { data, mode })
    }

    /// Convert back to an `image` buffer (RGB or grayscale)
    pub fn to_dynamic(&self) -> Result<DynamicImage> {
        let (height, width, _) = self.data.dim();
        let (w, h) = (width as u32, height as u32);

        let image = match self.mode {
            ColorMode::Gray => GrayImage::from_raw(w, h, self.data.iter().copied().collect())
                .map(DynamicImage::ImageLuma8),
            ColorMode::Rgb => RgbImage::from_raw(w, h, self.data.iter().copied().collect())
                .map(DynamicImage::ImageRgb8),
            ColorMode::Bgr => {
                let mut rgb = self.data.view();
                rgb.invert_axis(Axis(2));
                RgbImage::from_raw(w, h, rgb.iter().copied().collect())
                    .map(DynamicImage::ImageRgb8)
            }
        };

        image.ok_or_else(|| IngestError::InvalidShape(format!("{}x{} buffer too small", w, h)))
    }

    /// Convert to another channel layout
    pub fn to_mode(&self, mode: ColorMode) -> Result<Frame> {
        if mode == self.mode {
            return Ok(self.clone());
        }
        Frame::from_dynamic(&self.to_dynamic()?, mode)
    }

    pub fn data(&self) -> &Array3<u8> {
        &self.data
    }

    pub fn into_data(self) -> Array3<u8> {
        self.data
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Get frame dimensions (width, height)
    pub fn size(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }
}
