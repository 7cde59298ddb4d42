use anyhow::Result;
use image::{GrayImage, Luma};
use std::path::Path;

/// Writes a grayscale composite whose i-th strip is filled with
/// `markers[i]`. `extra` appends remainder columns to the final strip.
pub fn write_marker_composite(
    path: &Path,
    tile_width: u32,
    height: u32,
    markers: &[u8],
    extra: u32,
) -> Result<()> {
    let count = markers.len() as u32;
    let width = count * tile_width + extra;
    let img = GrayImage::from_fn(width, height, |x, _| {
        let idx = (x / tile_width).min(count - 1) as usize;
        Luma([markers[idx]])
    });
    img.save(path)?;
    Ok(())
}

/// Writes a composite where every strip carries the same spatial pattern,
/// varying in both axes. Useful for alignment checks: if two groups are
/// cropped/flipped with the same parameters, their planes stay identical.
pub fn write_pattern_composite(
    path: &Path,
    tiles: u32,
    tile_width: u32,
    height: u32,
) -> Result<()> {
    let img = GrayImage::from_fn(tiles * tile_width, height, |x, y| {
        Luma([(((x % tile_width) * 2 + y) % 256) as u8])
    });
    img.save(path)?;
    Ok(())
}

/// Value a marker byte takes after [0,1] scaling and symmetric
/// normalization.
pub fn normalized(marker: u8) -> f64 {
    (marker as f64 / 255.0 - 0.5) / 0.5
}
