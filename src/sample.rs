use std::path::PathBuf;
use tch::Tensor;

/// One fetched training sample.
///
/// `input` is the channel-concatenation of the input-domain tile groups;
/// `target` is the target-domain group, absent for single-domain datasets.
/// Both tensors share the same spatial dimensions (`crop_size x crop_size`)
/// because they were produced with one shared set of transform parameters.
///
/// Both paths point at the same composite file when the sample came from a
/// paired composite.
#[derive(Debug)]
pub struct PairedSample {
    pub input: Tensor,
    pub target: Option<Tensor>,
    pub input_path: PathBuf,
    pub target_path: Option<PathBuf>,
}

/// Creates a shallow clone: tensor storage is shared, paths are copied.
impl Clone for PairedSample {
    fn clone(&self) -> Self {
        Self {
            input: self.input.shallow_clone(),
            target: self.target.as_ref().map(Tensor::shallow_clone),
            input_path: self.input_path.clone(),
            target_path: self.target_path.clone(),
        }
    }
}

impl PairedSample {
    /// Spatial dimensions `(height, width)` of the input tensor.
    pub fn spatial_dims(&self) -> (i64, i64) {
        let size = self.input.size();
        (size[size.len() - 2], size[size.len() - 1])
    }
}
