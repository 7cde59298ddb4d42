//! Configuration for composite-pair datasets.
//!
//! A `DatasetConfig` is an explicit value struct constructed once (typically
//! through the builder) and passed by reference into dataset constructors.
//! There is no ambient/global option state anywhere in the crate.
//!
//! Example:
//! ```ignore
//! let config = DatasetConfig::builder()
//!     .dataroot("./datasets/maps")
//!     .phase("train")
//!     .direction(Direction::AToB)
//!     .load_size(286)
//!     .crop_size(256)
//!     .build();
//! let dataset = AlignedDataset::new(&config)?;
//! ```

use crate::error::DatasetError;
use anyhow::Result;
use image::imageops::FilterType;
use std::path::PathBuf;
use std::str::FromStr;

/// Which composite domain acts as the model input.
///
/// The composite always stores the same tile layout; the direction only
/// selects which configured channel count applies to the input side and
/// which to the target side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    AToB,
    BToA,
}

impl FromStr for Direction {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AtoB" => Ok(Direction::AToB),
            "BtoA" => Ok(Direction::BToA),
            other => Err(DatasetError::Config(format!(
                "invalid direction {:?} (expected \"AtoB\" or \"BtoA\")",
                other
            ))),
        }
    }
}

/// How an image is rescaled before cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalePolicy {
    /// Resize exactly to `load_size x load_size`.
    Square,
    /// Scale the width to `load_size`, keeping the aspect ratio; the height
    /// never drops below `crop_size` so a crop always fits.
    Width,
    /// Keep the original dimensions.
    Keep,
}

impl ScalePolicy {
    /// Dimensions an image of `size` will have after the scale stage.
    pub fn scaled_dims(&self, size: (u32, u32), load_size: u32, crop_size: u32) -> (u32, u32) {
        let (w, h) = size;
        match self {
            ScalePolicy::Square => (load_size, load_size),
            ScalePolicy::Width => {
                if w == 0 {
                    return (w, h);
                }
                let scaled_h = ((load_size as u64 * h as u64) / w as u64) as u32;
                (load_size, scaled_h.max(crop_size))
            }
            ScalePolicy::Keep => (w, h),
        }
    }
}

/// Where the crop window is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropPolicy {
    /// Origin drawn uniformly over the valid range.
    Random,
    /// Origin centered in the scaled image.
    Center,
    /// No crop stage at all.
    None,
}

/// Whether a horizontal flip may be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipPolicy {
    /// Flip with probability one half.
    Random,
    /// Never flip.
    None,
}

/// Geometry/photometry settings consumed by the transform layer.
///
/// Shared by every pipeline built for one dataset, so each tile group of a
/// sample sees identical scale/crop/flip behaviour.
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    pub load_size: u32,
    pub crop_size: u32,
    pub scale: ScalePolicy,
    pub crop: CropPolicy,
    pub flip: FlipPolicy,
    pub filter: FilterType,
}

impl PreprocessConfig {
    /// Rejects geometry that cannot produce a well-formed crop.
    pub fn validate(&self) -> Result<()> {
        if self.crop_size == 0 {
            return Err(DatasetError::Config("crop_size must be positive".to_string()).into());
        }
        if self.load_size == 0 {
            return Err(DatasetError::Config("load_size must be positive".to_string()).into());
        }
        if self.crop_size > self.load_size {
            return Err(DatasetError::Config(format!(
                "crop_size {} exceeds load_size {}",
                self.crop_size, self.load_size
            ))
            .into());
        }
        Ok(())
    }

    /// Dimensions an image of `size` will have after the scale stage.
    pub fn scaled_dims(&self, size: (u32, u32)) -> (u32, u32) {
        self.scale.scaled_dims(size, self.load_size, self.crop_size)
    }
}

/// Full configuration for one dataset instance.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Root directory holding the phase subdirectories.
    pub dataroot: PathBuf,
    /// Subdirectory under `dataroot` to enumerate (e.g. "train", "test").
    pub phase: String,
    /// Which domain is the model input.
    pub direction: Direction,
    /// Channel count of the A-side tensors (1 or 3).
    pub input_nc: i64,
    /// Channel count of the B-side tensors (1 or 3).
    pub output_nc: i64,
    /// Resize target applied before cropping.
    pub load_size: u32,
    /// Final square crop dimension (must not exceed `load_size`).
    pub crop_size: u32,
    /// Cap on the number of enumerated files; `None` means unbounded.
    pub max_dataset_size: Option<usize>,
    pub scale: ScalePolicy,
    pub crop: CropPolicy,
    pub flip: FlipPolicy,
    /// Interpolation used by the scale stage.
    pub filter: FilterType,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            dataroot: PathBuf::new(),
            phase: "train".to_string(),
            direction: Direction::AToB,
            input_nc: 3,
            output_nc: 3,
            load_size: 286,
            crop_size: 256,
            max_dataset_size: None,
            scale: ScalePolicy::Square,
            crop: CropPolicy::Random,
            flip: FlipPolicy::Random,
            filter: FilterType::CatmullRom,
        }
    }
}

impl DatasetConfig {
    pub fn builder() -> DatasetConfigBuilder {
        DatasetConfigBuilder::default()
    }

    /// Effective (input, target) channel counts after applying the direction.
    pub fn resolved_channels(&self) -> (i64, i64) {
        match self.direction {
            Direction::AToB => (self.input_nc, self.output_nc),
            Direction::BToA => (self.output_nc, self.input_nc),
        }
    }

    /// The geometry settings shared by every pipeline of this dataset.
    pub fn preprocess(&self) -> PreprocessConfig {
        PreprocessConfig {
            load_size: self.load_size,
            crop_size: self.crop_size,
            scale: self.scale,
            crop: self.crop,
            flip: self.flip,
            filter: self.filter,
        }
    }
}

/// Builder for `DatasetConfig` with method chaining.
#[derive(Default)]
pub struct DatasetConfigBuilder {
    config: DatasetConfig,
}

impl DatasetConfigBuilder {
    /// Set the root directory holding the phase subdirectories.
    pub fn dataroot(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.dataroot = root.into();
        self
    }

    /// Set the phase subdirectory name.
    pub fn phase(mut self, phase: impl Into<String>) -> Self {
        self.config.phase = phase.into();
        self
    }

    /// Set which domain is the model input.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.config.direction = direction;
        self
    }

    /// Set the A-side channel count (1 or 3).
    pub fn input_nc(mut self, nc: i64) -> Self {
        self.config.input_nc = nc;
        self
    }

    /// Set the B-side channel count (1 or 3).
    pub fn output_nc(mut self, nc: i64) -> Self {
        self.config.output_nc = nc;
        self
    }

    /// Set the resize target applied before cropping.
    pub fn load_size(mut self, size: u32) -> Self {
        self.config.load_size = size;
        self
    }

    /// Set the final square crop dimension.
    pub fn crop_size(mut self, size: u32) -> Self {
        self.config.crop_size = size;
        self
    }

    /// Cap the number of enumerated files.
    pub fn max_dataset_size(mut self, max: usize) -> Self {
        self.config.max_dataset_size = Some(max);
        self
    }

    /// Set the rescale policy.
    pub fn scale(mut self, scale: ScalePolicy) -> Self {
        self.config.scale = scale;
        self
    }

    /// Set the crop placement policy.
    pub fn crop(mut self, crop: CropPolicy) -> Self {
        self.config.crop = crop;
        self
    }

    /// Set the horizontal flip policy.
    pub fn flip(mut self, flip: FlipPolicy) -> Self {
        self.config.flip = flip;
        self
    }

    /// Set the interpolation filter for the scale stage.
    pub fn filter(mut self, filter: FilterType) -> Self {
        self.config.filter = filter;
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> DatasetConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = DatasetConfig::builder().dataroot("/data/maps").build();

        assert_eq!(config.phase, "train");
        assert_eq!(config.direction, Direction::AToB);
        assert_eq!(config.input_nc, 3);
        assert_eq!(config.load_size, 286);
        assert_eq!(config.crop_size, 256);
        assert!(config.max_dataset_size.is_none());
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("AtoB".parse::<Direction>().unwrap(), Direction::AToB);
        assert_eq!("BtoA".parse::<Direction>().unwrap(), Direction::BToA);

        let err = "sideways".parse::<Direction>().unwrap_err();
        assert!(matches!(err, DatasetError::Config(_)));
    }

    #[test]
    fn test_resolved_channels_swap_under_btoa() {
        let config = DatasetConfig::builder()
            .input_nc(3)
            .output_nc(1)
            .direction(Direction::BToA)
            .build();

        assert_eq!(config.resolved_channels(), (1, 3));
    }

    #[test]
    fn test_preprocess_rejects_crop_larger_than_load() {
        let config = DatasetConfig::builder().load_size(128).crop_size(256).build();

        let err = config.preprocess().validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DatasetError>(),
            Some(DatasetError::Config(_))
        ));
    }

    #[test]
    fn test_scaled_dims_per_policy() {
        let square = ScalePolicy::Square.scaled_dims((900, 100), 286, 256);
        assert_eq!(square, (286, 286));

        // Width scaling keeps the aspect ratio but never drops below the crop.
        let width = ScalePolicy::Width.scaled_dims((512, 256), 256, 200);
        assert_eq!(width, (256, 200));

        let width_tall = ScalePolicy::Width.scaled_dims((256, 512), 128, 64);
        assert_eq!(width_tall, (128, 256));

        assert_eq!(ScalePolicy::Keep.scaled_dims((70, 30), 256, 200), (70, 30));
    }
}
