//! Paired training-sample preparation for tiled composite images.
//!
//! Each source file is one composite image encoding several grayscale
//! sub-images as equal-width vertical strips: input-domain channel groups,
//! auxiliary groups, and (in paired mode) a target-domain strip. This crate
//! enumerates the composites, splits them back into tile groups, applies one
//! shared geometric transform to every group of a sample, and assembles
//! normalized `[C, H, W]` tensors ready for a training loop.
//!
//! ```ignore
//! use composite_pairs::{AlignedDataset, Dataset, DatasetConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let config = DatasetConfig::builder()
//!     .dataroot("./datasets/maps")
//!     .phase("train")
//!     .load_size(286)
//!     .crop_size(256)
//!     .build();
//!
//! let dataset = AlignedDataset::new(&config)?;
//! let mut rng = StdRng::seed_from_u64(42);
//! let sample = dataset.fetch(0, &mut rng)?;
//! // sample.input: [9, 256, 256], sample.target: Some([3, 256, 256])
//! ```
//!
//! Batching, shuffling and worker pools belong to the consuming loader; a
//! dataset is `Send + Sync` and can be shared read-only across workers, each
//! worker passing its own seeded generator to `fetch`.

pub mod config;
pub mod dataset;
pub mod error;
pub mod readers;
pub mod sample;
pub mod tiles;
pub mod transforms;

pub use config::{
    CropPolicy, DatasetConfig, Direction, FlipPolicy, PreprocessConfig, ScalePolicy,
};
pub use dataset::{AlignedDataset, Dataset, SingleDataset};
pub use error::DatasetError;
pub use sample::PairedSample;
pub use tiles::{split_composite, SplitMode, TileGroups};
pub use transforms::{sample_params, TensorPipeline, Transform, TransformParams};
