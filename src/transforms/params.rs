use crate::config::{CropPolicy, FlipPolicy, PreprocessConfig};
use rand::Rng;

/// Geometric parameters for one fetched sample.
///
/// Sampled exactly once per sample and then applied unchanged to every tile
/// group derived from the same composite. Sampling per group instead would
/// crop or flip the groups independently and destroy the pixel
/// correspondence between input and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformParams {
    /// Top-left corner of the crop window, in scaled-image coordinates.
    pub crop_origin: (u32, u32),
    /// Whether to mirror horizontally.
    pub flip: bool,
}

impl TransformParams {
    /// Parameters that leave the image untouched apart from scaling.
    pub fn identity() -> Self {
        Self {
            crop_origin: (0, 0),
            flip: false,
        }
    }
}

/// Draws one parameter set from an explicitly passed generator.
///
/// `reference_size` is the size of the reference tile group (every group of
/// a sample shares it by construction); the valid crop range is computed
/// against the dimensions that group will have after the scale stage. The
/// caller owns the generator, which keeps sampling deterministic under a
/// fixed seed and safe for per-worker generators.
pub fn sample_params<R: Rng + ?Sized>(
    config: &PreprocessConfig,
    reference_size: (u32, u32),
    rng: &mut R,
) -> TransformParams {
    let (scaled_w, scaled_h) = config.scaled_dims(reference_size);
    let max_x = scaled_w.saturating_sub(config.crop_size);
    let max_y = scaled_h.saturating_sub(config.crop_size);

    let crop_origin = match config.crop {
        CropPolicy::Random => (rng.random_range(0..=max_x), rng.random_range(0..=max_y)),
        CropPolicy::Center => (max_x / 2, max_y / 2),
        CropPolicy::None => (0, 0),
    };

    let flip = match config.flip {
        FlipPolicy::Random => rng.random_bool(0.5),
        FlipPolicy::None => false,
    };

    TransformParams { crop_origin, flip }
}
