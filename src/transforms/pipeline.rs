use crate::config::{CropPolicy, PreprocessConfig};
use crate::transforms::{
    Chain, Crop, EnsureRGB, Grayscale, HorizontalFlip, Normalize, Scale, ToTensor, Transform,
    TransformParams,
};
use anyhow::{Context, Result};
use image::DynamicImage;
use tch::Tensor;

/// Image-to-tensor pipeline with a fixed stage order:
/// scale → crop → horizontal flip → channel collapse → to-tensor → normalize.
///
/// Built once per configuration and channel mode, then reused across
/// samples. The crop and flip stages depend on the per-sample
/// [`TransformParams`] and are applied individually; the parameter-free
/// tensor tail is composed once with [`Transform::then`]. Two pipelines of
/// the same dataset may differ only in their grayscale flag, so applying
/// them with the same parameters keeps every output spatially aligned.
#[derive(Debug)]
pub struct TensorPipeline {
    scale: Scale,
    crop_policy: CropPolicy,
    crop_size: u32,
    grayscale: bool,
    convert: Chain<ToTensor, Normalize, Tensor>,
}

impl TensorPipeline {
    /// Builds a pipeline for the given geometry and channel mode.
    pub fn new(config: &PreprocessConfig, grayscale: bool) -> Result<Self> {
        let channels = if grayscale { 1 } else { 3 };
        Ok(Self {
            scale: Scale::new(config)?,
            crop_policy: config.crop,
            crop_size: config.crop_size,
            grayscale,
            convert: ToTensor.then(Normalize::symmetric(channels)?),
        })
    }

    /// Number of channels in the produced tensors.
    pub fn channels(&self) -> i64 {
        if self.grayscale {
            1
        } else {
            3
        }
    }

    /// Maps one image to a normalized `[C, H, W]` tensor using the given
    /// per-sample parameters.
    pub fn apply(&self, image: DynamicImage, params: &TransformParams) -> Result<Tensor> {
        let image = self.scale.apply(image)?;

        let image = match self.crop_policy {
            CropPolicy::None => image,
            _ => Crop::new(params.crop_origin, self.crop_size, self.crop_size)
                .apply(image)
                .context("crop stage failed")?,
        };

        let image = if params.flip {
            HorizontalFlip.apply(image)?
        } else {
            image
        };

        let image = if self.grayscale {
            Grayscale.apply(image)?
        } else {
            EnsureRGB.apply(image)?
        };

        self.convert.apply(image)
    }
}
