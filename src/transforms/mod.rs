//! Image-to-tensor transform stages and their composition.
//!
//! ```text
//! transforms/
//! ├── core.rs        → Transform trait + Chain combinator
//! ├── geometric.rs   → Scale, Crop, HorizontalFlip, Grayscale, EnsureRGB
//! ├── conversion.rs  → ToTensor, Normalize
//! ├── io.rs          → LoadImage
//! ├── params.rs      → per-sample TransformParams + sampler
//! └── pipeline.rs    → TensorPipeline (fixed stage order)
//! ```
//!
//! All stages are pure; geometric randomness is drawn once per sample into a
//! [`TransformParams`] value and handed to the pipeline at apply time.

pub mod conversion;
pub mod core;
pub mod geometric;
pub mod io;
pub mod params;
pub mod pipeline;

pub use conversion::{Normalize, ToTensor};
pub use core::{Chain, Transform};
pub use geometric::{Crop, EnsureRGB, Grayscale, HorizontalFlip, Scale};
pub use io::LoadImage;
pub use params::{sample_params, TransformParams};
pub use pipeline::TensorPipeline;
