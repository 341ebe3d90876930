// ============================================================
// Layer 4 — Image Transform
// ============================================================
// Turns raw image bytes into the fixed-size input the network
// expects. Training and inference share this one transform:
//
//   1. decode (jpeg / png) and convert to RGB
//   2. resize to size × size with bilinear filtering
//   3. scale each channel from [0, 255] to [0, 1]
//   4. lay out channel-first: [C, H, W] flattened
//
// No augmentation, no mean/std normalisation.
//
// Reference: image crate documentation (imageops::resize)

use std::{fs, io::ErrorKind, path::Path};

use image::{imageops::FilterType, DynamicImage};

use crate::domain::error::CloudError;

/// Side length of the square network input.
pub const IMAGE_SIZE: usize = 224;

/// RGB.
pub const CHANNELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTransform {
    size: usize,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self::new(IMAGE_SIZE)
    }
}

impl ImageTransform {
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "image size must be positive");
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of f32 values produced per image.
    pub fn tensor_len(&self) -> usize {
        CHANNELS * self.size * self.size
    }

    /// Read an image file and transform it.
    pub fn load(&self, path: &Path) -> Result<Vec<f32>, CloudError> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CloudError::ImageNotFound { path: path.to_path_buf() },
            _ => CloudError::Io(e),
        })?;
        let image = image::load_from_memory(&bytes).map_err(|e| CloudError::ImageDecode {
            path:   path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(self.apply(&image))
    }

    /// Resize and scale an already decoded image to [C, H, W] floats.
    pub fn apply(&self, image: &DynamicImage) -> Vec<f32> {
        let side    = self.size as u32;
        let rgb     = image.to_rgb8();
        let resized = image::imageops::resize(&rgb, side, side, FilterType::Triangle);

        let plane   = self.size * self.size;
        let mut out = vec![0.0f32; self.tensor_len()];

        // pixels() walks row-major, so i is the (y * size + x) offset
        for (i, pixel) in resized.pixels().enumerate() {
            for c in 0..CHANNELS {
                out[c * plane + i] = f32::from(pixel[c]) / 255.0;
            }
        }
        out
    }
}
