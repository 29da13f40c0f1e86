//! Image preprocessing for the classifier input contract.
//!
//! Produces an NHWC tensor of shape `(1, 224, 224, 3)` scaled into `[-1, 1]`,
//! the input range of MobileNet-style backbones.

use std::io::Cursor;
use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use log::debug;
use ndarray::Array4;

use crate::classifier::ScanError;

/// Spatial resolution expected by the classifier.
pub const INPUT_SIZE: u32 = 224;
/// Colour channels expected by the classifier.
pub const INPUT_CHANNELS: usize = 3;

/// Normalized image batch handed to a [`crate::Classifier`].
pub type ImageTensor = Array4<f32>;

/// Shape of every tensor produced by [`ImagePreprocessor`].
pub fn input_shape() -> [usize; 4] {
    [1, INPUT_SIZE as usize, INPUT_SIZE as usize, INPUT_CHANNELS]
}

/// Converts raw images into classifier tensors.
///
/// Resizing always uses nearest-neighbour sampling to an exact square, so the
/// same image always yields a bit-identical tensor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagePreprocessor;

impl ImagePreprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Decodes the file at `path` and converts it into a tensor.
    ///
    /// The format is sniffed from the content, not the extension.
    ///
    /// # Errors
    /// - `Io` if the file cannot be opened
    /// - `Decode` if the content is not a supported raster image
    pub fn preprocess_path(&self, path: impl AsRef<Path>) -> Result<ImageTensor, ScanError> {
        let path = path.as_ref();
        debug!("Decoding image {:?}", path);
        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Ok(self.preprocess_image(&image))
    }

    /// Decodes an in-memory encoded image and converts it into a tensor.
    pub fn preprocess_bytes(&self, bytes: &[u8]) -> Result<ImageTensor, ScanError> {
        let image = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .decode()?;
        Ok(self.preprocess_image(&image))
    }

    /// Converts an already decoded image into a tensor.
    pub fn preprocess_image(&self, image: &DynamicImage) -> ImageTensor {
        let rgb = image
            .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Nearest)
            .to_rgb8();

        Array4::from_shape_fn(input_shape(), |(_, y, x, c)| {
            scale_intensity(rgb[(x as u32, y as u32)][c])
        })
    }
}

/// Maps `[0, 255]` into `[-1, 1]`.
fn scale_intensity(value: u8) -> f32 {
    value as f32 / 127.5 - 1.0
}
