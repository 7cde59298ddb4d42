use thiserror::Error;

/// Error taxonomy for dataset construction and per-sample fetching.
///
/// Variants are attached to `anyhow` chains throughout the crate, so callers
/// can `downcast_ref::<DatasetError>()` to branch on the failure class:
/// - `Config` and `NotFound` are raised eagerly at dataset construction,
/// - `MalformedImage` is raised per sample at fetch time,
/// - `IndexOutOfBounds` signals caller misuse of `fetch`.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Invalid configuration (e.g. crop size exceeding load size).
    #[error("configuration error: {0}")]
    Config(String),

    /// Root directory missing or not a directory.
    #[error("not found: {0}")]
    NotFound(String),

    /// Composite image that cannot be split into the expected tiles.
    #[error("malformed composite image: {0}")]
    MalformedImage(String),

    /// Index outside `[0, len)`.
    #[error("index {index} out of bounds for dataset of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Decode/encode failure from the image codec.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Underlying filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
