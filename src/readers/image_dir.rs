use crate::error::DatasetError;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions accepted as image files (case-insensitive).
pub const IMAGE_EXTENSIONS: &[&str] = &["bmp", "jpeg", "jpg", "png", "ppm", "tif", "tiff", "webp"];

/// Enumerates image files under a root directory.
///
/// The walk is recursive; symlinks and non-regular files are skipped, and
/// only paths matching [`IMAGE_EXTENSIONS`] are kept. The result is sorted
/// by full path so enumeration order is stable across runs regardless of the
/// underlying directory listing order, then truncated to `max_files` when a
/// cap is set.
///
/// # Example
/// ```ignore
/// let paths = ImageDirSource::new("./data/maps/train")
///     .with_max_files(Some(1000))
///     .collect()?;
/// ```
pub struct ImageDirSource {
    root: PathBuf,
    max_files: Option<usize>,
}

impl ImageDirSource {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_files: None,
        }
    }

    /// Caps the number of returned paths. `None` removes the cap.
    pub fn with_max_files(mut self, max: Option<usize>) -> Self {
        self.max_files = max;
        self
    }

    /// Walks the tree and returns the sorted, capped path list.
    ///
    /// Fails with [`DatasetError::NotFound`] when the root is missing or is
    /// not a directory. An empty result is valid.
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        let metadata = fs::metadata(&self.root).map_err(|_| {
            DatasetError::NotFound(format!("image root {}", self.root.display()))
        })?;
        if !metadata.is_dir() {
            return Err(DatasetError::NotFound(format!(
                "image root {} is not a directory",
                self.root.display()
            ))
            .into());
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry.with_context(|| {
                format!("failed to read directory entry under {}", self.root.display())
            })?;
            if entry.path_is_symlink() || !entry.file_type().is_file() {
                continue;
            }
            if is_image_file(entry.path()) {
                paths.push(entry.into_path());
            }
        }

        paths.sort();
        if let Some(max) = self.max_files {
            paths.truncate(max);
        }

        tracing::debug!(
            root = %self.root.display(),
            count = paths.len(),
            "enumerated image files"
        );
        Ok(paths)
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
