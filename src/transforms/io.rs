use crate::transforms::Transform;
use anyhow::{anyhow, Context, Result};
use image::{io::Reader as ImageReader, DynamicImage, RgbImage};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use turbojpeg::{Decompressor, Image, PixelFormat};

/// Loads and decodes an image file.
///
/// JPEG files go through TurboJPEG; everything else is decoded by the
/// `image` crate with format detection from the file contents. A TurboJPEG
/// failure falls back to the standard decoder rather than failing the
/// sample.
#[derive(Debug, Clone, Default)]
pub struct LoadImage;

impl LoadImage {
    pub fn new() -> Self {
        Self
    }

    fn decode_jpeg(path: &Path) -> Result<DynamicImage> {
        let data = fs::read(path)
            .with_context(|| format!("failed to read JPEG {}", path.display()))?;

        let mut decompressor =
            Decompressor::new().context("failed to create TurboJPEG decompressor")?;
        let header = decompressor
            .read_header(&data)
            .with_context(|| format!("failed to read JPEG header of {}", path.display()))?;

        let (width, height) = (header.width, header.height);
        let mut pixels = vec![0u8; width * height * 3];
        decompressor
            .decompress(
                &data,
                Image {
                    pixels: pixels.as_mut_slice(),
                    width,
                    height,
                    format: PixelFormat::RGB,
                    pitch: width * 3,
                },
            )
            .with_context(|| format!("failed to decompress JPEG {}", path.display()))?;

        let rgb = RgbImage::from_raw(width as u32, height as u32, pixels)
            .ok_or_else(|| anyhow!("TurboJPEG produced a short pixel buffer"))?;
        Ok(DynamicImage::ImageRgb8(rgb))
    }

    fn decode_standard(path: &Path) -> Result<DynamicImage> {
        let data = fs::read(path)
            .with_context(|| format!("failed to read image {}", path.display()))?;
        ImageReader::new(Cursor::new(data))
            .with_guessed_format()?
            .decode()
            .with_context(|| format!("failed to decode image {}", path.display()))
    }

    fn is_jpeg(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg"))
            .unwrap_or(false)
    }
}

impl Transform<PathBuf, DynamicImage> for LoadImage {
    fn apply(&self, path: PathBuf) -> Result<DynamicImage> {
        if Self::is_jpeg(&path) {
            Self::decode_jpeg(&path).or_else(|err| {
                tracing::debug!(
                    path = %path.display(),
                    error = %err,
                    "TurboJPEG failed, falling back to standard decoder"
                );
                Self::decode_standard(&path)
            })
        } else {
            Self::decode_standard(&path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_png_round_trip() -> Result<()> {
        let mut img = RgbImage::new(3, 3);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(2, 2, Rgb([0, 0, 255]));

        let file = NamedTempFile::with_suffix(".png")?;
        img.save(file.path())?;

        let loaded = LoadImage::new().apply(file.path().to_path_buf())?;
        assert_eq!(loaded.dimensions(), (3, 3));
        assert_eq!(loaded.to_rgb8().get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(loaded.to_rgb8().get_pixel(2, 2), &Rgb([0, 0, 255]));
        Ok(())
    }

    #[test]
    fn test_missing_file_errors() {
        let result = LoadImage::new().apply(PathBuf::from("nonexistent.png"));
        assert!(result.is_err());
    }
}
