use crate::transforms::Transform;
use anyhow::{ensure, Context, Result};
use image::{DynamicImage, GenericImageView};
use tch::{Kind, Tensor};

// ============================================================================
// ToTensor
// ============================================================================

/// Converts an image to a channel-first f32 tensor in [0.0, 1.0] range.
///
/// Grayscale input maps to `[1, H, W]`, RGB to `[3, H, W]`. Any other pixel
/// format is converted to RGB first; run images through `Grayscale` or
/// `EnsureRGB` beforehand when the channel count must be pinned.
#[derive(Debug)]
pub struct ToTensor;

/// RGB raw buffers are channel-interleaved (`[R, G, B, R, G, B, ...]` per
/// row), so they reshape to `[H, W, C]` and must be permuted into the
/// channel-first layout.
fn chw_from_interleaved(raw: &[u8], height: i64, width: i64, channels: i64) -> Tensor {
    Tensor::from_slice(raw)
        .reshape(&[height, width, channels])
        .permute(&[2, 0, 1])
        .contiguous()
}

impl Transform<DynamicImage, Tensor> for ToTensor {
    fn apply(&self, img: DynamicImage) -> Result<Tensor> {
        let (width, height) = img.dimensions();
        ensure!(
            width > 0 && height > 0,
            "image dimensions must be positive (got {}x{})",
            width,
            height
        );

        let tensor = match img {
            DynamicImage::ImageLuma8(img) => {
                Tensor::from_slice(img.as_raw()).reshape(&[1, height as i64, width as i64])
            }
            DynamicImage::ImageRgb8(img) => {
                chw_from_interleaved(img.as_raw(), height as i64, width as i64, 3)
            }
            other => {
                let rgb = other.to_rgb8();
                chw_from_interleaved(rgb.as_raw(), height as i64, width as i64, 3)
            }
        };

        tensor
            .to_kind(Kind::Float)
            .f_div_scalar(255.0)
            .context("failed to scale tensor into [0, 1]")
    }
}

// ============================================================================
// Normalize
// ============================================================================

/// Normalizes tensors using channel-wise statistics:
/// `output[c,h,w] = (input[c,h,w] - mean[c]) / std[c]`.
///
/// The dimensions of `mean` and `std` must match the input tensor's channel
/// count.
#[derive(Debug)]
pub struct Normalize {
    mean: Vec<f32>,
    std: Vec<f32>,
}

impl Normalize {
    /// Creates new normalization parameters.
    pub fn new(mean: &[f32], std: &[f32]) -> Result<Self> {
        ensure!(!mean.is_empty(), "normalization mean cannot be empty");
        ensure!(
            mean.len() == std.len(),
            "normalization mean and std must match in dimension (got {} and {})",
            mean.len(),
            std.len()
        );
        Ok(Self {
            mean: mean.to_vec(),
            std: std.to_vec(),
        })
    }

    /// Symmetric normalization mapping [0, 1] inputs to [-1, 1], with one
    /// constant per channel (1 for grayscale, 3 for color).
    pub fn symmetric(channels: usize) -> Result<Self> {
        ensure!(
            channels == 1 || channels == 3,
            "symmetric normalization expects 1 or 3 channels (got {})",
            channels
        );
        Self::new(&vec![0.5; channels], &vec![0.5; channels])
    }
}

impl Transform<Tensor, Tensor> for Normalize {
    fn apply(&self, tensor: Tensor) -> Result<Tensor> {
        let (num_channels, _height, _width) = tensor
            .size3()
            .context("input must be a 3D tensor [C, H, W]")?;

        ensure!(
            num_channels as usize == self.mean.len(),
            "channel count mismatch: input has {} channels but normalization expects {}",
            num_channels,
            self.mean.len()
        );

        let mean = Tensor::from_slice(&self.mean)
            .reshape(&[num_channels, 1, 1])
            .to_kind(tensor.kind());
        let std = Tensor::from_slice(&self.std)
            .reshape(&[num_channels, 1, 1])
            .to_kind(tensor.kind());

        Ok((tensor - mean) / std)
    }
}
