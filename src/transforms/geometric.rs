use crate::config::{PreprocessConfig, ScalePolicy};
use crate::transforms::Transform;
use anyhow::{ensure, Result};
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageBuffer, RgbImage};

// ============================================================================
// EnsureRGB
// ============================================================================

/// Ensures that the image is indeed 3-channel RGB.
#[derive(Debug, Clone)]
pub struct EnsureRGB;

impl Transform<DynamicImage, DynamicImage> for EnsureRGB {
    fn apply(&self, img: DynamicImage) -> Result<DynamicImage> {
        Ok(match img {
            DynamicImage::ImageRgb8(_) => img,
            _ => DynamicImage::ImageRgb8(img.to_rgb8()),
        })
    }
}

// ============================================================================
// Scale
// ============================================================================

/// Rescales an image according to the configured policy.
///
/// Unlike an aspect-preserving fit, the `Square` policy maps every input to
/// exactly `load_size x load_size`; downstream crop arithmetic depends on the
/// scaled dimensions being known in advance of the pixel data.
#[derive(Debug)]
pub struct Scale {
    policy: ScalePolicy,
    load_size: u32,
    crop_size: u32,
    filter: FilterType,
}

impl Scale {
    pub fn new(config: &PreprocessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            policy: config.scale,
            load_size: config.load_size,
            crop_size: config.crop_size,
            filter: config.filter,
        })
    }
}

impl Transform<DynamicImage, DynamicImage> for Scale {
    fn apply(&self, img: DynamicImage) -> Result<DynamicImage> {
        let dims = img.dimensions();
        let (w, h) = self
            .policy
            .scaled_dims(dims, self.load_size, self.crop_size);
        if (w, h) == dims {
            return Ok(img);
        }
        Ok(img.resize_exact(w, h, self.filter))
    }
}

// ============================================================================
// Crop
// ============================================================================

/// Cuts a fixed window out of an image.
///
/// The origin comes from the per-sample transform parameters, so every tile
/// group of one sample is cropped at the same position.
#[derive(Debug, Clone, Copy)]
pub struct Crop {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl Crop {
    pub fn new(origin: (u32, u32), width: u32, height: u32) -> Self {
        Self {
            x: origin.0,
            y: origin.1,
            width,
            height,
        }
    }
}

impl Transform<DynamicImage, DynamicImage> for Crop {
    fn apply(&self, img: DynamicImage) -> Result<DynamicImage> {
        let (w, h) = img.dimensions();
        ensure!(
            self.x + self.width <= w && self.y + self.height <= h,
            "crop window {}x{} at ({}, {}) exceeds image bounds {}x{}",
            self.width,
            self.height,
            self.x,
            self.y,
            w,
            h
        );
        Ok(img.crop_imm(self.x, self.y, self.width, self.height))
    }
}

// ============================================================================
// HorizontalFlip
// ============================================================================

/// Mirrors an image around its vertical axis.
///
/// Always flips; the decision whether to flip at all belongs to the sampled
/// transform parameters, not to this stage.
#[derive(Debug, Clone)]
pub struct HorizontalFlip;

impl HorizontalFlip {
    /// Row-wise reversal for RGB8 buffers, avoiding the generic pixel API.
    fn flip_rgb8(img: RgbImage) -> RgbImage {
        let (width, height) = img.dimensions();
        let row_len = width as usize * 3;
        let pixels = img.into_raw();

        let mut flipped = Vec::with_capacity(pixels.len());
        for row in pixels.chunks_exact(row_len) {
            for px in row.rchunks_exact(3) {
                flipped.extend_from_slice(px);
            }
        }

        ImageBuffer::from_raw(width, height, flipped)
            .expect("flipped buffer has the source dimensions")
    }
}

impl Transform<DynamicImage, DynamicImage> for HorizontalFlip {
    fn apply(&self, img: DynamicImage) -> Result<DynamicImage> {
        Ok(match img {
            DynamicImage::ImageRgb8(rgb) => DynamicImage::ImageRgb8(Self::flip_rgb8(rgb)),
            other => other.fliph(),
        })
    }
}

// ============================================================================
// Grayscale
// ============================================================================

/// Collapses an image to a single luminance channel.
#[derive(Debug, Clone)]
pub struct Grayscale;

impl Transform<DynamicImage, DynamicImage> for Grayscale {
    fn apply(&self, img: DynamicImage) -> Result<DynamicImage> {
        Ok(DynamicImage::ImageLuma8(img.to_luma8()))
    }
}
