//! Datasets assembling paired samples from tiled composite images.
//!
//! Both datasets resolve an index to a composite file, split it into tile
//! groups, draw one set of transform parameters, and run every group through
//! a pipeline with those same parameters. All per-fetch state (decoded
//! image, tile groups, parameters) is transient, so a dataset can be shared
//! read-only across worker threads, each worker passing its own generator.

use crate::config::{DatasetConfig, PreprocessConfig};
use crate::error::DatasetError;
use crate::readers::ImageDirSource;
use crate::sample::PairedSample;
use crate::tiles::{split_composite, SplitMode, TileGroups};
use crate::transforms::{sample_params, LoadImage, TensorPipeline, Transform, TransformParams};
use anyhow::{Context, Result};
use image::DynamicImage;
use rand::RngCore;
use std::path::PathBuf;
use tch::Tensor;

/// Random-access source of paired samples.
///
/// `fetch` takes the generator explicitly: the caller (typically a worker
/// loop) owns and seeds it, which makes sampling reproducible and keeps the
/// dataset free of interior mutability.
pub trait Dataset: Send + Sync {
    /// Number of composite files; stable for the dataset's lifetime.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loads, splits and transforms the composite at `index`.
    fn fetch(&self, index: usize, rng: &mut dyn RngCore) -> Result<PairedSample>;
}

fn validate_channels(nc: i64, name: &str) -> Result<()> {
    if nc != 1 && nc != 3 {
        return Err(DatasetError::Config(format!(
            "{} must be 1 or 3 (got {})",
            name, nc
        ))
        .into());
    }
    Ok(())
}

fn resolve_path(paths: &[PathBuf], index: usize) -> Result<&PathBuf> {
    paths.get(index).ok_or_else(|| {
        DatasetError::IndexOutOfBounds {
            index,
            len: paths.len(),
        }
        .into()
    })
}

/// Applies the input pipeline to groups A, C and D with one shared parameter
/// set and concatenates the results along the channel axis, in group order.
fn concat_input_groups(
    pipeline: &TensorPipeline,
    groups: TileGroups,
    params: &TransformParams,
) -> Result<Tensor> {
    let a = pipeline.apply(DynamicImage::ImageRgb8(groups.group_a), params)?;
    let c = pipeline.apply(DynamicImage::ImageRgb8(groups.group_c), params)?;
    let d = pipeline.apply(DynamicImage::ImageRgb8(groups.group_d), params)?;
    Ok(Tensor::cat(&[a, c, d], 0))
}

// ============================================================================
// AlignedDataset
// ============================================================================

/// Dataset over paired composites: nine tiles encoding the input-domain
/// groups plus the target strip.
pub struct AlignedDataset {
    paths: Vec<PathBuf>,
    loader: LoadImage,
    preprocess: PreprocessConfig,
    input_pipeline: TensorPipeline,
    target_pipeline: TensorPipeline,
}

impl AlignedDataset {
    /// Enumerates `dataroot/phase` and builds the two pipelines.
    ///
    /// Fails eagerly with [`DatasetError::Config`] on invalid geometry or
    /// channel counts, and [`DatasetError::NotFound`] when the directory is
    /// missing. An empty directory is a valid zero-length dataset.
    pub fn new(config: &DatasetConfig) -> Result<Self> {
        let preprocess = config.preprocess();
        preprocess.validate()?;
        validate_channels(config.input_nc, "input_nc")?;
        validate_channels(config.output_nc, "output_nc")?;

        let (input_nc, output_nc) = config.resolved_channels();
        let dir = config.dataroot.join(&config.phase);
        let paths = ImageDirSource::new(&dir)
            .with_max_files(config.max_dataset_size)
            .collect()?;

        tracing::debug!(
            dir = %dir.display(),
            len = paths.len(),
            input_nc,
            output_nc,
            "constructed aligned dataset"
        );

        Ok(Self {
            paths,
            loader: LoadImage::new(),
            input_pipeline: TensorPipeline::new(&preprocess, input_nc == 1)?,
            target_pipeline: TensorPipeline::new(&preprocess, output_nc == 1)?,
            preprocess,
        })
    }

    /// The enumerated composite files, in fetch order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl Dataset for AlignedDataset {
    fn len(&self) -> usize {
        self.paths.len()
    }

    fn fetch(&self, index: usize, rng: &mut dyn RngCore) -> Result<PairedSample> {
        let path = resolve_path(&self.paths, index)?;
        let composite = self
            .loader
            .apply(path.clone())
            .with_context(|| format!("failed to load composite {}", path.display()))?;

        let mut groups = split_composite(&composite, SplitMode::Paired)?;
        let target_group = groups.target.take().ok_or_else(|| {
            DatasetError::MalformedImage("paired composite produced no target strip".to_string())
        })?;

        // One draw per sample, shared by every group, keeps the input and
        // target crops spatially aligned.
        let params = sample_params(&self.preprocess, target_group.dimensions(), rng);

        let input = concat_input_groups(&self.input_pipeline, groups, &params)?;
        let target = self
            .target_pipeline
            .apply(DynamicImage::ImageRgb8(target_group), &params)?;

        Ok(PairedSample {
            input,
            target: Some(target),
            input_path: path.clone(),
            target_path: Some(path.clone()),
        })
    }
}

// ============================================================================
// SingleDataset
// ============================================================================

/// Dataset over single-domain composites: eight tiles, input groups only.
pub struct SingleDataset {
    paths: Vec<PathBuf>,
    loader: LoadImage,
    preprocess: PreprocessConfig,
    input_pipeline: TensorPipeline,
}

impl SingleDataset {
    /// Enumerates `dataroot/phase` and builds the input pipeline.
    pub fn new(config: &DatasetConfig) -> Result<Self> {
        let preprocess = config.preprocess();
        preprocess.validate()?;
        validate_channels(config.input_nc, "input_nc")?;
        validate_channels(config.output_nc, "output_nc")?;

        let (input_nc, _) = config.resolved_channels();
        let dir = config.dataroot.join(&config.phase);
        let paths = ImageDirSource::new(&dir)
            .with_max_files(config.max_dataset_size)
            .collect()?;

        tracing::debug!(
            dir = %dir.display(),
            len = paths.len(),
            input_nc,
            "constructed single dataset"
        );

        Ok(Self {
            paths,
            loader: LoadImage::new(),
            input_pipeline: TensorPipeline::new(&preprocess, input_nc == 1)?,
            preprocess,
        })
    }

    /// The enumerated composite files, in fetch order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl Dataset for SingleDataset {
    fn len(&self) -> usize {
        self.paths.len()
    }

    fn fetch(&self, index: usize, rng: &mut dyn RngCore) -> Result<PairedSample> {
        let path = resolve_path(&self.paths, index)?;
        let composite = self
            .loader
            .apply(path.clone())
            .with_context(|| format!("failed to load composite {}", path.display()))?;

        let groups = split_composite(&composite, SplitMode::Single)?;

        let params = sample_params(&self.preprocess, groups.group_a.dimensions(), rng);
        let input = concat_input_groups(&self.input_pipeline, groups, &params)?;

        Ok(PairedSample {
            input,
            target: None,
            input_path: path.clone(),
            target_path: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Direction;
    use tempfile::tempdir;

    fn config_at(root: &std::path::Path) -> DatasetConfig {
        DatasetConfig::builder()
            .dataroot(root)
            .phase("train")
            .load_size(64)
            .crop_size(64)
            .build()
    }

    #[test]
    fn test_construction_rejects_crop_larger_than_load() -> Result<()> {
        let dir = tempdir()?;
        std::fs::create_dir(dir.path().join("train"))?;

        let config = DatasetConfig::builder()
            .dataroot(dir.path())
            .load_size(64)
            .crop_size(128)
            .build();

        let err = AlignedDataset::new(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DatasetError>(),
            Some(DatasetError::Config(_))
        ));
        Ok(())
    }

    #[test]
    fn test_construction_rejects_bad_channel_count() -> Result<()> {
        let dir = tempdir()?;
        std::fs::create_dir(dir.path().join("train"))?;

        let mut config = config_at(dir.path());
        config.input_nc = 2;

        let err = AlignedDataset::new(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DatasetError>(),
            Some(DatasetError::Config(_))
        ));
        Ok(())
    }

    #[test]
    fn test_construction_fails_on_missing_phase_directory() -> Result<()> {
        let dir = tempdir()?;
        // No "train" subdirectory created.
        let err = AlignedDataset::new(&config_at(dir.path())).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DatasetError>(),
            Some(DatasetError::NotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn test_empty_phase_directory_is_a_zero_length_dataset() -> Result<()> {
        let dir = tempdir()?;
        std::fs::create_dir(dir.path().join("train"))?;

        let dataset = AlignedDataset::new(&config_at(dir.path()))?;
        assert_eq!(dataset.len(), 0);
        assert!(dataset.is_empty());
        Ok(())
    }

    #[test]
    fn test_direction_only_affects_channel_modes() -> Result<()> {
        let dir = tempdir()?;
        std::fs::create_dir(dir.path().join("train"))?;

        let mut config = config_at(dir.path());
        config.input_nc = 1;
        config.output_nc = 3;
        config.direction = Direction::BToA;

        // BtoA swaps the channel flags: input becomes 3-channel.
        let dataset = AlignedDataset::new(&config)?;
        assert_eq!(dataset.input_pipeline.channels(), 3);
        assert_eq!(dataset.target_pipeline.channels(), 1);
        Ok(())
    }
}
